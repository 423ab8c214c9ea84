// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation state machine.
//!
//! One normalized inbound event per invocation. The engine gates the
//! event (bot switch, session bootstrap, idle expiry, warning resume),
//! then routes it by the session's current step, sending prompts through
//! the [`Messenger`] and persisting the session after every transition.
//!
//! Collaborator failures never escape [`Engine::handle_event`]: the
//! webhook acknowledgment was already sent, so errors are logged, the
//! customer gets a generic apology, and the session resets to the menu.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, Utc};
use tracing::{debug, error, warn};
use uuid::Uuid;

use faena_core::types::{
    Customer, DeliveryMode, DocumentKind, EventKind, InboundEvent, OrderItem, OrderStatus,
};
use faena_core::{FaenaError, Messenger, Order, Repository};

use crate::availability::{self, AvailabilityMode};
use crate::normalize::{self, NormalizedInput};
use crate::prompts;
use crate::session::{PendingProduct, Schedule, Session, Step};
use crate::store::SessionStore;

/// Tunables handed down from the application config.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub shop_name: String,
    pub days_ahead: u32,
    /// Idle seconds before the "still there?" warning.
    pub warning_secs: u64,
    /// Idle seconds before the session expires.
    pub timeout_secs: u64,
    /// Store-level TTL backstop for session records.
    pub session_ttl_secs: u64,
    /// Public base URL for the pickup QR link.
    pub public_url: String,
}

/// The conversation engine. Cheap to clone behind `Arc`s.
pub struct Engine {
    repo: Arc<dyn Repository>,
    messenger: Arc<dyn Messenger>,
    store: Arc<dyn SessionStore>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(
        repo: Arc<dyn Repository>,
        messenger: Arc<dyn Messenger>,
        store: Arc<dyn SessionStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            repo,
            messenger,
            store,
            config,
        }
    }

    pub fn messenger(&self) -> &Arc<dyn Messenger> {
        &self.messenger
    }

    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repo
    }

    /// Process one inbound event end to end. Never returns an error;
    /// failures are logged and answered with a generic apology.
    pub async fn handle_event(&self, event: InboundEvent) {
        let from = event.from.clone();
        if let Err(e) = self.process(&event).await {
            error!(phone = %from, error = %e, "conversation turn failed");
            if let Err(send_err) = self
                .messenger
                .send_text(&from, prompts::GENERIC_APOLOGY)
                .await
            {
                error!(phone = %from, error = %send_err, "could not deliver apology");
                return;
            }
            // Recover to a safe step so the next message is routable.
            if let Ok(Some(mut session)) = self.store.get(&from).await {
                session.cart.clear();
                session.step = Step::Menu;
                session.touch();
                let _ = self.persist(session).await;
                let _ = self.send_main_menu(&from).await;
            }
        }
    }

    async fn process(&self, event: &InboundEvent) -> Result<(), FaenaError> {
        let from = &event.from;

        // 1. Administrative switch.
        let settings = self.repo.bot_settings().await?;
        if !settings.enabled {
            return self.messenger.send_text(from, &settings.closed_message).await;
        }

        // 2. Session bootstrap. The triggering message is consumed.
        let Some(mut session) = self.store.get(from).await? else {
            let customer = self.repo.customer_by_phone(from).await?;
            let known = customer.is_some();
            let step = if known { Step::Menu } else { Step::AwaitingName };
            self.persist(Session::new(from, customer, step)).await?;
            return if known {
                self.send_main_menu(from).await
            } else {
                self.messenger.send_text(from, prompts::ASK_NAME).await
            };
        };

        // 3. Idle check, lazily on this event.
        let idle_secs = (Utc::now() - session.last_activity).num_seconds();
        if !session.warned && idle_secs > self.config.warning_secs as i64 {
            session.warned = true;
            self.persist(session).await?;
            return self.messenger.send_text(from, prompts::WARNING).await;
        }
        if idle_secs > self.config.timeout_secs as i64 {
            self.store.delete(from).await?;
            return self.messenger.send_text(from, prompts::EXPIRED).await;
        }

        let input = normalize::capture(event);
        debug!(phone = %from, id = %input.id, "inbound normalized");

        // 4. Any free text answers the warning; the content is not routed.
        if session.warned && matches!(event.kind, EventKind::Text(_)) {
            session.touch();
            let step = session.step.clone();
            self.persist(session).await?;
            self.messenger.send_text(from, prompts::RESUME_ACK).await?;
            return self.resume_prompt(from, &step).await;
        }

        // 5. Refresh activity and route.
        session.touch();
        self.persist(session.clone()).await?;
        self.route(session, input).await
    }

    /// Re-display the prompt for the step the customer was on before the
    /// inactivity warning interrupted.
    async fn resume_prompt(&self, from: &str, step: &Step) -> Result<(), FaenaError> {
        match step {
            Step::Products => self.show_products(from).await,
            Step::CollectingQuantity { .. } => {
                self.messenger.send_text(from, prompts::QUANTITY_REPROMPT).await
            }
            Step::DateSelection { mode } => {
                self.show_dates(from, AvailabilityMode::from(*mode)).await
            }
            Step::PickupChoice { .. } | Step::PickupPersonPrompt { .. } => {
                self.messenger.send_text(from, prompts::ASK_PICKUP).await
            }
            _ => self.send_main_menu(from).await,
        }
    }

    async fn route(&self, mut session: Session, input: NormalizedInput) -> Result<(), FaenaError> {
        let from = session.phone.clone();

        // Terminal markers: any new message starts over at the menu.
        if matches!(session.step, Step::Exited | Step::Finalized) {
            session.cart.clear();
            session.step = Step::Menu;
            self.persist(session).await?;
            return self.send_main_menu(&from).await;
        }

        // Steps that consume the raw text body.
        match session.step.clone() {
            Step::AwaitingName => return self.on_name(session, &input).await,
            Step::AwaitingDocument { raw_name } => {
                return self.on_document(session, &raw_name, &input).await;
            }
            Step::PickupPersonPrompt { schedule } => {
                return self.on_pickup_name(session, schedule, &input).await;
            }
            Step::PickupChoice { schedule } => match input.id.as_str() {
                "RETIRA_ULTIMO" => {
                    let name = session
                        .customer
                        .as_ref()
                        .and_then(|c| c.last_pickup_person.clone())
                        .ok_or_else(|| {
                            FaenaError::Internal("pickup choice without remembered name".into())
                        })?;
                    return self.to_confirmation(session, schedule, name).await;
                }
                "RETIRA_OTRO" => {
                    session.step = Step::PickupPersonPrompt { schedule };
                    self.persist(session).await?;
                    return self.messenger.send_text(&from, prompts::ASK_PICKUP_NEW).await;
                }
                _ => {}
            },
            _ => {}
        }

        match input.id.as_str() {
            "MENU_PEDIR" => {
                session.cart.clear();
                session.step = Step::Products;
                self.persist(session).await?;
                self.show_products(&from).await
            }
            "MENU_HORARIOS" => {
                session.step = Step::ViewingSchedule;
                self.persist(session).await?;
                self.show_dates(&from, AvailabilityMode::Browse).await
            }
            "MENU_SALIR" => {
                session.cart.clear();
                session.step = Step::Exited;
                self.persist(session).await?;
                self.messenger.send_text(&from, prompts::FAREWELL).await
            }
            "VOLVER_MENU" => {
                session.step = Step::Menu;
                self.persist(session).await?;
                self.send_main_menu(&from).await
            }
            "AGREGAR_MAS" => {
                session.step = Step::Products;
                self.persist(session).await?;
                self.show_products(&from).await
            }
            id if id.starts_with("PROD_") => {
                // Ids come back verbatim from list replies; take the raw
                // form to keep the stored id's case intact.
                let product_id = input
                    .raw
                    .trim()
                    .strip_prefix("PROD_")
                    .unwrap_or(input.raw.trim())
                    .to_string();
                self.on_product_selected(session, &product_id).await
            }
            id if id.starts_with("SINSTOCK_") => {
                self.messenger
                    .send_text(&from, prompts::OUT_OF_STOCK_SELECTED)
                    .await?;
                self.show_products(&from).await
            }
            _ => {
                if let Step::CollectingQuantity { pending } = session.step.clone() {
                    return self.on_quantity(session, pending, &input).await;
                }
                match input.id.as_str() {
                    "VACIAR_CARRITO" => {
                        session.cart.clear();
                        session.step = Step::Products;
                        self.persist(session).await?;
                        self.messenger.send_text(&from, prompts::CART_EMPTIED).await?;
                        self.show_products(&from).await
                    }
                    "FIN_PRODUCTOS" => self.on_finish_products(session).await,
                    "TIPO_DESPOSTE" | "TIPO_RETIRO" => {
                        let mode = if input.id == "TIPO_DESPOSTE" {
                            DeliveryMode::Turn
                        } else {
                            DeliveryMode::Direct
                        };
                        session.step = Step::DateSelection { mode };
                        self.persist(session).await?;
                        self.show_dates(&from, AvailabilityMode::from(mode)).await
                    }
                    id if id.starts_with("FECHA_") => {
                        let Ok(date) = id.trim_start_matches("FECHA_").parse::<NaiveDate>() else {
                            return self.not_understood(&from).await;
                        };
                        self.on_date_selected(session, date).await
                    }
                    id if id.starts_with("HORA_") => {
                        let time = id.trim_start_matches("HORA_").to_string();
                        self.on_time_selected(session, time).await
                    }
                    "CONFIRMAR_PEDIDO" => {
                        if let Step::Confirming {
                            schedule,
                            pickup_person,
                        } = session.step.clone()
                        {
                            self.finalize(session, schedule, pickup_person).await
                        } else {
                            self.not_understood(&from).await
                        }
                    }
                    "CANCELAR_PEDIDO" => {
                        session.step = Step::Menu;
                        self.persist(session).await?;
                        self.send_main_menu(&from).await
                    }
                    _ => self.not_understood(&from).await,
                }
            }
        }
    }

    // --- Identification ---

    async fn on_name(&self, mut session: Session, input: &NormalizedInput) -> Result<(), FaenaError> {
        let from = session.phone.clone();
        session.step = Step::AwaitingDocument {
            raw_name: input.raw.trim().to_string(),
        };
        self.persist(session).await?;
        self.messenger.send_text(&from, prompts::ASK_DOCUMENT).await
    }

    async fn on_document(
        &self,
        mut session: Session,
        raw_name: &str,
        input: &NormalizedInput,
    ) -> Result<(), FaenaError> {
        let from = session.phone.clone();
        let digits = normalize::only_digits(&input.raw);

        if !normalize::is_dni(&digits) && !normalize::is_cuit(&digits) {
            return self.messenger.send_text(&from, prompts::INVALID_DOCUMENT).await;
        }

        let is_company = normalize::is_cuit(&digits);
        let name = if is_company {
            normalize::normalize_company(raw_name)
        } else {
            normalize::title_case_name(raw_name)
        };

        let customer = Customer {
            phone: from.clone(),
            name: name.clone(),
            document: digits,
            document_kind: if is_company {
                DocumentKind::Cuit
            } else {
                DocumentKind::Dni
            },
            last_pickup_person: None,
            created_at: Utc::now(),
        };
        self.repo.create_customer(&customer).await?;

        session.customer = Some(customer);
        session.cart.clear();
        session.step = Step::Menu;
        self.persist(session).await?;

        self.messenger.send_text(&from, &prompts::greeting(&name)).await?;
        self.send_main_menu(&from).await
    }

    // --- Product selection & quantities ---

    async fn on_product_selected(
        &self,
        mut session: Session,
        product_id: &str,
    ) -> Result<(), FaenaError> {
        let from = session.phone.clone();
        let product = self.repo.product_by_id(product_id).await?;

        let Some(product) = product.filter(|p| p.active) else {
            return self.messenger.send_text(&from, prompts::PRODUCT_UNAVAILABLE).await;
        };

        if product.stock <= 0 {
            self.messenger
                .send_text(&from, &prompts::product_out_of_stock(&product.name))
                .await?;
            return self.show_products(&from).await;
        }

        session.step = Step::CollectingQuantity {
            pending: PendingProduct {
                product_id: product.id.clone(),
                name: product.name.clone(),
                price_per_kg: product.price_per_kg,
                requires_turn: product.requires_turn,
            },
        };
        self.persist(session).await?;

        self.messenger
            .send_buttons(&from, prompts::quantity_prompt(&product))
            .await?;
        self.messenger.send_text(&from, prompts::QUANTITY_FREE_HINT).await
    }

    async fn on_quantity(
        &self,
        mut session: Session,
        pending: PendingProduct,
        input: &NormalizedInput,
    ) -> Result<(), FaenaError> {
        let from = session.phone.clone();

        let quantity: u32 = match input.id.as_str() {
            "CANT_1" => 1,
            "CANT_2" => 2,
            "CANT_3" => 3,
            _ => match input.raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return self.messenger.send_text(&from, prompts::INVALID_QUANTITY).await;
                }
            },
        };

        // Re-validate against current stock before committing the line.
        let product = self.repo.product_by_id(&pending.product_id).await?;
        let Some(product) =
            product.filter(|p| p.active && p.stock >= i64::from(quantity))
        else {
            self.messenger
                .send_text(&from, &prompts::stock_insufficient(&pending.name))
                .await?;
            session.step = Step::Products;
            self.persist(session).await?;
            return self.show_products(&from).await;
        };

        let item = OrderItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            plural_name: product.plural_name.clone(),
            gender: product.gender,
            quantity,
            price_per_kg: pending.price_per_kg,
            requires_turn: pending.requires_turn,
        };
        session.add_to_cart(item);
        session.step = Step::Products;

        let line = session
            .cart
            .iter()
            .find(|l| l.product_id == product.id)
            .cloned()
            .ok_or_else(|| FaenaError::Internal("cart line vanished after merge".into()))?;
        let cart = session.cart.clone();
        self.persist(session).await?;

        self.messenger
            .send_text(&from, &prompts::added_line(&line, quantity))
            .await?;
        self.messenger
            .send_text(&from, &prompts::cart_summary(&cart))
            .await?;
        self.messenger.send_buttons(&from, prompts::cart_actions()).await
    }

    async fn on_finish_products(&self, mut session: Session) -> Result<(), FaenaError> {
        let from = session.phone.clone();

        if session.cart.is_empty() {
            return self.messenger.send_text(&from, prompts::EMPTY_CART).await;
        }

        // A cart without turn items never needs the modality question.
        if !session.cart.iter().any(|l| l.requires_turn) {
            session.step = Step::DateSelection {
                mode: DeliveryMode::Direct,
            };
            self.persist(session).await?;
            return self.show_dates(&from, AvailabilityMode::Direct).await;
        }

        session.step = Step::ModalitySelection;
        self.persist(session).await?;
        self.messenger.send_list(&from, prompts::modality_list()).await
    }

    // --- Scheduling ---

    async fn on_date_selected(
        &self,
        mut session: Session,
        date: NaiveDate,
    ) -> Result<(), FaenaError> {
        let from = session.phone.clone();

        match session.step.clone() {
            Step::DateSelection {
                mode: DeliveryMode::Direct,
            } => {
                self.ask_pickup_person(session, Schedule::Direct { date }).await
            }
            Step::DateSelection {
                mode: DeliveryMode::Turn,
            } => {
                let slots = self.free_slots(date).await?;
                if slots.is_empty() {
                    self.messenger.send_text(&from, prompts::NO_SLOTS_DAY).await?;
                    return self.messenger.send_buttons(&from, prompts::back_buttons()).await;
                }
                session.step = Step::TimeSelection { date };
                self.persist(session).await?;
                self.messenger
                    .send_list(&from, prompts::slots_list(date, &slots))
                    .await
            }
            Step::ViewingSchedule => {
                let slots = self.free_slots(date).await?;
                if slots.is_empty() {
                    self.messenger.send_text(&from, prompts::NO_SLOTS_DAY).await?;
                } else {
                    self.messenger
                        .send_text(&from, &prompts::browse_slots_text(date, &slots))
                        .await?;
                }
                self.messenger.send_buttons(&from, prompts::back_buttons()).await
            }
            _ => self.not_understood(&from).await,
        }
    }

    async fn on_time_selected(
        &self,
        session: Session,
        time: String,
    ) -> Result<(), FaenaError> {
        let from = session.phone.clone();
        let Step::TimeSelection { date } = session.step.clone() else {
            return self.not_understood(&from).await;
        };
        self.ask_pickup_person(session, Schedule::Turn { date, time }).await
    }

    // --- Pickup person & confirmation ---

    async fn ask_pickup_person(
        &self,
        mut session: Session,
        schedule: Schedule,
    ) -> Result<(), FaenaError> {
        let from = session.phone.clone();

        let last = session
            .customer
            .as_ref()
            .and_then(|c| c.last_pickup_person.clone());

        if let Some(last) = last {
            session.step = Step::PickupChoice { schedule };
            self.persist(session).await?;
            self.messenger
                .send_buttons(&from, prompts::pickup_choice(&last))
                .await
        } else {
            session.step = Step::PickupPersonPrompt { schedule };
            self.persist(session).await?;
            self.messenger.send_text(&from, prompts::ASK_PICKUP).await
        }
    }

    async fn on_pickup_name(
        &self,
        mut session: Session,
        schedule: Schedule,
        input: &NormalizedInput,
    ) -> Result<(), FaenaError> {
        let name = normalize::title_case_name(input.raw.trim());
        self.repo.set_last_pickup_person(&session.phone, &name).await?;
        if let Some(customer) = session.customer.as_mut() {
            customer.last_pickup_person = Some(name.clone());
        }
        self.to_confirmation(session, schedule, name).await
    }

    async fn to_confirmation(
        &self,
        mut session: Session,
        schedule: Schedule,
        pickup_person: String,
    ) -> Result<(), FaenaError> {
        let from = session.phone.clone();
        let customer_name = session
            .customer
            .as_ref()
            .map(|c| c.name.clone())
            .ok_or_else(|| FaenaError::Internal("confirmation without a customer".into()))?;

        session.step = Step::Confirming {
            schedule: schedule.clone(),
            pickup_person: pickup_person.clone(),
        };
        self.persist(session).await?;

        self.messenger
            .send_buttons(
                &from,
                prompts::confirmation(&customer_name, &pickup_person, &schedule),
            )
            .await
    }

    // --- Finalize ---

    /// Turn the cart into a durable order: re-check stock, insert the
    /// reservation (the slot-unique index is the only lock), then
    /// decrement stock per line.
    async fn finalize(
        &self,
        mut session: Session,
        schedule: Schedule,
        pickup_person: String,
    ) -> Result<(), FaenaError> {
        let from = session.phone.clone();
        let customer_name = session
            .customer
            .as_ref()
            .map(|c| c.name.clone())
            .ok_or_else(|| FaenaError::Internal("finalize without a customer".into()))?;

        // Pre-check every line; no partial order on any failure.
        for line in &session.cart {
            let product = self.repo.product_by_id(&line.product_id).await?;
            let Some(product) = product.filter(|p| p.active) else {
                return self
                    .messenger
                    .send_text(&from, &prompts::product_unavailable_named(&line.name))
                    .await;
            };
            if product.stock < i64::from(line.quantity) {
                return self
                    .messenger
                    .send_text(&from, &prompts::stock_insufficient(&product.name))
                    .await;
            }
        }

        let order = Order {
            id: Uuid::new_v4().to_string(),
            phone: from.clone(),
            customer_name: customer_name.clone(),
            pickup_person: pickup_person.clone(),
            date: schedule.date(),
            time: schedule.time().map(String::from),
            mode: schedule.mode(),
            items: session.cart.clone(),
            status: OrderStatus::Reserved,
            closing: None,
            created_at: Utc::now(),
        };

        match self.repo.create_order(&order).await {
            Ok(()) => {}
            Err(FaenaError::SlotTaken { date, .. }) => {
                // Expected contention: another customer took the slot
                // between listing and confirming.
                self.messenger.send_text(&from, prompts::SLOT_TAKEN).await?;
                let slots = self.free_slots(date).await?;
                if slots.is_empty() {
                    self.messenger.send_text(&from, prompts::NO_SLOTS_DAY).await?;
                    self.messenger.send_buttons(&from, prompts::back_buttons()).await?;
                } else {
                    self.messenger
                        .send_list(&from, prompts::slots_list(date, &slots))
                        .await?;
                }
                session.step = Step::TimeSelection { date };
                self.persist(session).await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        // Reservation holds; stock drift on a partial failure here is
        // logged, not rolled back.
        for line in &order.items {
            match self.repo.decrement_stock(&line.product_id, line.quantity).await {
                Ok(true) => {}
                Ok(false) => {
                    warn!(
                        order = %order.id,
                        product = %line.product_id,
                        quantity = line.quantity,
                        "stock decrement not applied after reservation"
                    );
                }
                Err(e) => {
                    warn!(
                        order = %order.id,
                        product = %line.product_id,
                        error = %e,
                        "stock decrement failed after reservation"
                    );
                }
            }
        }

        let cart = session.cart.clone();
        session.cart.clear();
        session.step = Step::Finalized;
        self.persist(session).await?;

        self.messenger
            .send_text(
                &from,
                &prompts::order_summary(&customer_name, &pickup_person, &cart, &schedule),
            )
            .await?;
        self.messenger
            .send_image(&from, &format!("{}/qr/{}", self.config.public_url, order.id))
            .await?;
        self.messenger.send_text(&from, prompts::QR_INSTRUCTION).await
    }

    // --- Shared prompt helpers ---

    async fn persist(&self, session: Session) -> Result<(), FaenaError> {
        let phone = session.phone.clone();
        self.store
            .set(
                &phone,
                session,
                Duration::from_secs(self.config.session_ttl_secs),
            )
            .await
    }

    async fn send_main_menu(&self, to: &str) -> Result<(), FaenaError> {
        self.messenger
            .send_buttons(to, prompts::main_menu(&self.config.shop_name))
            .await
    }

    async fn show_products(&self, to: &str) -> Result<(), FaenaError> {
        let products = self.repo.active_products().await?;
        self.messenger.send_list(to, prompts::product_list(&products)).await
    }

    async fn show_dates(&self, to: &str, mode: AvailabilityMode) -> Result<(), FaenaError> {
        let today = Local::now().date_naive();
        let candidates =
            availability::dates_with_schedule(self.repo.as_ref(), today, self.config.days_ahead)
                .await?;

        let mut dates = Vec::new();
        for date in candidates {
            if availability::day_has_availability(self.repo.as_ref(), date, mode).await? {
                dates.push(date);
            }
        }

        let (delivery_mode, browse) = match mode {
            AvailabilityMode::Turn => (DeliveryMode::Turn, false),
            AvailabilityMode::Direct => (DeliveryMode::Direct, false),
            AvailabilityMode::Browse => (DeliveryMode::Turn, true),
        };
        self.messenger
            .send_list(to, prompts::dates_list(&dates, delivery_mode, browse))
            .await
    }

    async fn free_slots(&self, date: NaiveDate) -> Result<Vec<String>, FaenaError> {
        let now = Local::now();
        availability::free_slots_for_date(
            self.repo.as_ref(),
            date,
            now.date_naive(),
            &now.format("%H:%M").to_string(),
        )
        .await
    }

    async fn not_understood(&self, to: &str) -> Result<(), FaenaError> {
        self.messenger.send_text(to, prompts::NOT_UNDERSTOOD).await?;
        self.send_main_menu(to).await
    }
}
