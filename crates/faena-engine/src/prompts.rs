// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spanish prompt texts and outbound message builders.
//!
//! All customer-facing copy lives here; the state machine only decides
//! which prompt to send.

use chrono::NaiveDate;

use faena_core::types::{
    Button, ButtonMessage, DeliveryMode, Gender, ListMessage, ListRow, Order, OrderItem, Product,
};

use crate::clock::day_label;
use crate::normalize::safe_title;
use crate::session::Schedule;

pub const WARNING: &str = "⏰ ¿Seguís ahí?";
pub const EXPIRED: &str =
    "⌛ La sesión expiró por inactividad.\nEscribí nuevamente para empezar.";
pub const RESUME_ACK: &str = "👍 Perfecto, seguimos.";
pub const ASK_NAME: &str =
    "👋 Antes de empezar, ¿podés decirme tu *nombre completo o empresa*?";
pub const ASK_DOCUMENT: &str =
    "🧾 ¿Podés indicarme tu *DNI* o *CUIT/CUIL*?\n\n• DNI: 7 u 8 números\n• CUIT/CUIL: 11 números";
pub const INVALID_DOCUMENT: &str = "❌ Documento inválido.\n• DNI: 7 u 8 números\n• CUIT/CUIL: 11 números\n\nIntentá nuevamente.";
pub const FAREWELL: &str = "👋 Gracias por escribirnos. ¡Te esperamos!";
pub const NOT_UNDERSTOOD: &str = "❌ No entendí la opción.";
pub const PRODUCT_UNAVAILABLE: &str = "❌ Producto no disponible.";
pub const OUT_OF_STOCK_SELECTED: &str = "❌ Ese producto está sin stock en este momento.";
pub const QUANTITY_FREE_HINT: &str =
    "✍️ Si querés más de 3, escribí el número (solo números).";
pub const QUANTITY_REPROMPT: &str = "🔢 Decime la cantidad que querés.";
pub const INVALID_QUANTITY: &str = "❌ Cantidad inválida. Escribí un número (ej: 4).";
pub const CART_EMPTIED: &str = "🗑️ Carrito vaciado.";
pub const EMPTY_CART: &str = "❌ Tenés que elegir al menos un producto.";
pub const SLOT_TAKEN: &str =
    "❌ Ese horario acaba de ser tomado por otro cliente. Elegí otro por favor.";
pub const NO_SLOTS_DAY: &str = "❌ No hay horarios disponibles para ese día.";
pub const ASK_PICKUP: &str = "👤 ¿Quién va a retirar el pedido?";
pub const ASK_PICKUP_NEW: &str = "👤 Escribí el nombre de quien retira:";
pub const QR_INSTRUCTION: &str =
    "📦 Este es tu *QR de retiro*.\n\n📍 Presentalo cuando vengas a retirar tu pedido.";
pub const GENERIC_APOLOGY: &str = "❌ Ocurrió un error. Volvamos a empezar.";
pub const DIRECT_WINDOW: &str = "08:00 a 12:00";

pub fn greeting(name: &str) -> String {
    format!("¡Gracias *{name}*! 👍")
}

pub fn main_menu(shop_name: &str) -> ButtonMessage {
    ButtonMessage {
        body: format!("👋 Bienvenido a *{}*", shop_name.to_uppercase()),
        buttons: vec![
            Button {
                id: "MENU_PEDIR".to_string(),
                title: "🥩 Hacer pedido".to_string(),
            },
            Button {
                id: "MENU_HORARIOS".to_string(),
                title: "🕒 Ver horarios".to_string(),
            },
            Button {
                id: "MENU_SALIR".to_string(),
                title: "❌ Salir".to_string(),
            },
        ],
    }
}

pub fn modality_list() -> ListMessage {
    ListMessage {
        body: "🔪 ¿Cómo querés recibir tu pedido?".to_string(),
        button_text: "Elegir opción".to_string(),
        section_title: "Modalidad".to_string(),
        rows: vec![
            ListRow {
                id: "TIPO_DESPOSTE".to_string(),
                title: "Presenciar el desposte".to_string(),
                description: "Ver el proceso en el momento".to_string(),
            },
            ListRow {
                id: "TIPO_RETIRO".to_string(),
                title: "Retirar despostada".to_string(),
                description: format!("Retiro en el día ({DIRECT_WINDOW} hs)"),
            },
        ],
        footer: None,
    }
}

pub fn product_list(products: &[Product]) -> ListMessage {
    let rows = products
        .iter()
        .map(|p| {
            let out_of_stock = p.stock <= 0;
            ListRow {
                id: if out_of_stock {
                    format!("SINSTOCK_{}", p.id)
                } else {
                    format!("PROD_{}", p.id)
                },
                title: if out_of_stock {
                    safe_title(&format!("⛔ {}", p.name))
                } else {
                    safe_title(&p.name)
                },
                description: if out_of_stock {
                    "Sin stock".to_string()
                } else if p.requires_turn {
                    "Requiere turno".to_string()
                } else {
                    "Retiro en el día (08-12 hs)".to_string()
                },
            }
        })
        .collect();

    ListMessage {
        body: "🥩 *Elegí tus productos*\n\n👉 Seleccioná *uno por vez*.\n👉 Cada vez que elijas uno, podés *sumar otro* o *finalizar el pedido*.".to_string(),
        button_text: "Ver productos".to_string(),
        section_title: "Productos".to_string(),
        rows,
        footer: None,
    }
}

/// "¿Cuántas *medias reses* querés?" with grammatical gender agreement.
pub fn quantity_prompt(product: &Product) -> ButtonMessage {
    let article = match product.gender {
        Gender::Feminine => "Cuántas",
        Gender::Masculine => "Cuántos",
    };
    let name = product.plural_name.as_deref().unwrap_or(&product.name);
    ButtonMessage {
        body: format!("🔢 ¿{article} *{name}* querés?"),
        buttons: vec![
            Button {
                id: "CANT_1".to_string(),
                title: "1".to_string(),
            },
            Button {
                id: "CANT_2".to_string(),
                title: "2".to_string(),
            },
            Button {
                id: "CANT_3".to_string(),
                title: "3".to_string(),
            },
        ],
    }
}

/// "➕ *2 Medias reses* agregadas" style confirmation for one addition.
pub fn added_line(item: &OrderItem, quantity: u32) -> String {
    let name = item.name_for_quantity(quantity);
    let verb = match item.gender {
        Gender::Feminine => "agregada",
        Gender::Masculine => "agregado",
    };
    format!("➕ *{quantity} {name}* {verb}")
}

pub fn cart_summary(cart: &[OrderItem]) -> String {
    let lines = cart
        .iter()
        .map(|i| format!("• {} {}", i.quantity, i.name_for_quantity(i.quantity)))
        .collect::<Vec<_>>()
        .join("\n");
    format!("🛒 *Tu pedido hasta ahora:*\n{lines}")
}

pub fn cart_actions() -> ButtonMessage {
    ButtonMessage {
        body: "¿Qué querés hacer ahora?".to_string(),
        buttons: vec![
            Button {
                id: "AGREGAR_MAS".to_string(),
                title: "➕ Agregar productos".to_string(),
            },
            Button {
                id: "FIN_PRODUCTOS".to_string(),
                title: "✅ Finalizar".to_string(),
            },
            Button {
                id: "VACIAR_CARRITO".to_string(),
                title: "🗑️ Vaciar".to_string(),
            },
        ],
    }
}

pub fn stock_insufficient(name: &str) -> String {
    format!("❌ No hay stock suficiente de *{name}*.")
}

pub fn product_out_of_stock(name: &str) -> String {
    format!("❌ *{name}* está sin stock.")
}

pub fn product_unavailable_named(name: &str) -> String {
    format!("❌ Producto no disponible: {name}")
}

pub fn dates_list(dates: &[NaiveDate], mode: DeliveryMode, browse: bool) -> ListMessage {
    let mut rows: Vec<ListRow> = dates
        .iter()
        .take(8)
        .map(|d| ListRow {
            id: format!("FECHA_{}", d.format("%Y-%m-%d")),
            title: day_label(*d),
            description: "Disponible".to_string(),
        })
        .collect();

    rows.push(ListRow {
        id: "VOLVER_MENU".to_string(),
        title: "⬅️ Volver al menú".to_string(),
        description: String::new(),
    });
    rows.push(ListRow {
        id: "MENU_SALIR".to_string(),
        title: "❌ Cancelar".to_string(),
        description: String::new(),
    });

    let body = if browse {
        "📅 Fechas con turnos disponibles".to_string()
    } else {
        match mode {
            DeliveryMode::Direct => format!("📅 Elegí el día (retiro de {DIRECT_WINDOW})"),
            DeliveryMode::Turn => "📅 Elegí el día para presenciar el desposte".to_string(),
        }
    };

    ListMessage {
        body,
        button_text: "Ver fechas".to_string(),
        section_title: "Fechas".to_string(),
        rows,
        footer: None,
    }
}

pub fn slots_list(date: NaiveDate, slots: &[String]) -> ListMessage {
    ListMessage {
        body: format!("🕒 Horarios disponibles para *{}*", day_label(date)),
        button_text: "Ver horarios".to_string(),
        section_title: "Horarios".to_string(),
        rows: slots
            .iter()
            .take(10)
            .map(|h| ListRow {
                id: format!("HORA_{h}"),
                title: h.clone(),
                description: "Disponible".to_string(),
            })
            .collect(),
        footer: None,
    }
}

/// Read-only slot listing used from the browse-schedule flow.
pub fn browse_slots_text(date: NaiveDate, slots: &[String]) -> String {
    let lines = slots
        .iter()
        .map(|h| format!("• {h}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("🕒 Horarios libres para *{}*:\n{lines}", day_label(date))
}

pub fn back_buttons() -> ButtonMessage {
    ButtonMessage {
        body: "Elige una opción".to_string(),
        buttons: vec![
            Button {
                id: "VOLVER_MENU".to_string(),
                title: "⬅️ Volver al menú".to_string(),
            },
            Button {
                id: "MENU_SALIR".to_string(),
                title: "❌ Salir".to_string(),
            },
        ],
    }
}

pub fn pickup_choice(last_pickup_person: &str) -> ButtonMessage {
    ButtonMessage {
        body: format!("👤 ¿Quién va a retirar?\n\nÚltimo: *{last_pickup_person}*"),
        buttons: vec![
            Button {
                id: "RETIRA_ULTIMO".to_string(),
                title: safe_title(&format!("✅ {last_pickup_person}")),
            },
            Button {
                id: "RETIRA_OTRO".to_string(),
                title: "✍️ Otra persona".to_string(),
            },
        ],
    }
}

fn mode_text(schedule: &Schedule) -> &'static str {
    match schedule {
        Schedule::Turn { .. } => "👀 Presenciar desposte",
        Schedule::Direct { .. } => "📦 Retiro (08:00 a 12:00)",
    }
}

fn schedule_lines(schedule: &Schedule) -> String {
    match schedule {
        Schedule::Turn { time, .. } => format!("🕒 Turno: *{time}*\n"),
        Schedule::Direct { .. } => format!("🕒 Retiro: *{DIRECT_WINDOW}*\n"),
    }
}

pub fn confirmation(customer_name: &str, pickup_person: &str, schedule: &Schedule) -> ButtonMessage {
    ButtonMessage {
        body: format!(
            "✅ *Confirmá tu pedido*\n\n👤 Cliente: *{customer_name}*\n📦 Retira: *{pickup_person}*\n\n🔪 Modalidad: *{}*\n📅 Día: *{}*\n{}",
            mode_text(schedule),
            day_label(schedule.date()),
            schedule_lines(schedule),
        ),
        buttons: vec![
            Button {
                id: "CONFIRMAR_PEDIDO".to_string(),
                title: "✅ Confirmar".to_string(),
            },
            Button {
                id: "CANCELAR_PEDIDO".to_string(),
                title: "❌ Cancelar".to_string(),
            },
            Button {
                id: "VACIAR_CARRITO".to_string(),
                title: "🗑️ Vaciar".to_string(),
            },
        ],
    }
}

pub fn order_summary(
    customer_name: &str,
    pickup_person: &str,
    cart: &[OrderItem],
    schedule: &Schedule,
) -> String {
    let items = cart
        .iter()
        .map(|i| format!("• {} {}", i.quantity, i.name_for_quantity(i.quantity)))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "✅ *Pedido reservado con éxito*\n\n👤 Cliente: *{customer_name}*\n📦 Retira: *{pickup_person}*\n\n🧾 Productos:\n{items}\n\n📅 Día: *{}*\n{}\n💬 *El precio final se calcula al retirar según los kilos reales.*",
        day_label(schedule.date()),
        schedule_lines(schedule),
    )
}

/// Final WhatsApp message after the order is closed at the counter.
pub fn delivered_summary(order: &Order) -> String {
    let Some(closing) = &order.closing else {
        return String::new();
    };
    let lines = closing
        .lines
        .iter()
        .map(|l| format!("• {}: {} kg → ${}", l.name, l.kilos, l.subtotal))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "✅ *Pedido entregado*\n\n{lines}\n\n💰 Total: *${}*\n\n¡Gracias por tu compra! 🥩",
        closing.total
    )
}
