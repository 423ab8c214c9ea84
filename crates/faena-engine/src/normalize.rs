// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound event normalization and text helpers.
//!
//! Interactive replies already carry their identifier; free text is
//! upper-cased and run through a legacy synonym table so older message
//! templates keep working. The raw text is preserved alongside for
//! name/quantity capture.

use faena_core::types::{EventKind, InboundEvent};

/// The raw body plus the canonical routing identifier for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    /// Literal body or selection id, untouched.
    pub raw: String,
    /// Trimmed, upper-cased, synonym-substituted routing id.
    pub id: String,
}

/// Legacy free-text phrases from older templates, mapped to canonical ids.
const SYNONYMS: [(&str, &str); 5] = [
    ("HACER PEDIDO", "MENU_PEDIR"),
    ("VER HORARIOS", "MENU_HORARIOS"),
    ("SALIR", "MENU_SALIR"),
    ("PRESENCIAR DESPOSTE", "TIPO_DESPOSTE"),
    ("RETIRAR DESPOSTADA", "TIPO_RETIRO"),
];

/// Capture the raw body and routing id from one inbound event.
pub fn capture(event: &InboundEvent) -> NormalizedInput {
    let raw = match &event.kind {
        EventKind::Text(body) => body.clone(),
        EventKind::Selection(id) => id.clone(),
    };

    let mut id = raw.trim().to_uppercase();
    for (phrase, canonical) in SYNONYMS {
        if id == phrase {
            id = canonical.to_string();
            break;
        }
    }

    NormalizedInput { raw, id }
}

/// Keep only ASCII digits.
pub fn only_digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// National ID: 7 or 8 digits.
pub fn is_dni(digits: &str) -> bool {
    (7..=8).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// Tax ID: exactly 11 digits.
pub fn is_cuit(digits: &str) -> bool {
    digits.len() == 11 && digits.chars().all(|c| c.is_ascii_digit())
}

/// Title-case a person name: "juan PEREZ" -> "Juan Perez".
pub fn title_case_name(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Company names are stored upper-cased and trimmed.
pub fn normalize_company(text: &str) -> String {
    text.trim().to_uppercase()
}

/// Truncate to WhatsApp's interactive-title budget with an ellipsis.
pub fn safe_title(text: &str) -> String {
    const MAX: usize = 24;
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= MAX {
        text.to_string()
    } else {
        let mut out: String = chars[..MAX - 1].iter().collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_event(body: &str) -> InboundEvent {
        InboundEvent {
            from: "123".to_string(),
            kind: EventKind::Text(body.to_string()),
        }
    }

    #[test]
    fn selection_id_passes_through() {
        let event = InboundEvent {
            from: "123".to_string(),
            kind: EventKind::Selection("PROD_abc".to_string()),
        };
        let input = capture(&event);
        assert_eq!(input.raw, "PROD_abc");
        assert_eq!(input.id, "PROD_ABC");
    }

    #[test]
    fn legacy_phrases_map_to_canonical_ids() {
        assert_eq!(capture(&text_event("hacer pedido")).id, "MENU_PEDIR");
        assert_eq!(capture(&text_event("  Salir ")).id, "MENU_SALIR");
        assert_eq!(
            capture(&text_event("Presenciar desposte")).id,
            "TIPO_DESPOSTE"
        );
    }

    #[test]
    fn raw_text_is_preserved_for_capture_steps() {
        let input = capture(&text_event("juan perez"));
        assert_eq!(input.raw, "juan perez");
        assert_eq!(input.id, "JUAN PEREZ");
    }

    #[test]
    fn document_validation_by_length() {
        assert!(is_dni("1234567"));
        assert!(is_dni("30111222"));
        assert!(!is_dni("123456"));
        assert!(!is_dni("123456789"));
        assert!(is_cuit("30712345678"));
        assert!(!is_cuit("3071234567"));
    }

    #[test]
    fn only_digits_strips_punctuation() {
        assert_eq!(only_digits("30.111.222"), "30111222");
        assert_eq!(only_digits("dni 30111222"), "30111222");
    }

    #[test]
    fn title_case_handles_mixed_input() {
        assert_eq!(title_case_name("juan PEREZ"), "Juan Perez");
        assert_eq!(title_case_name("  maría  lópez "), "María López");
    }

    #[test]
    fn company_names_are_upper_cased() {
        assert_eq!(normalize_company(" frigorífico sur "), "FRIGORÍFICO SUR");
    }

    #[test]
    fn safe_title_truncates_long_names() {
        let long = "Un nombre de producto realmente largo";
        let truncated = safe_title(long);
        assert_eq!(truncated.chars().count(), 24);
        assert!(truncated.ends_with('…'));
        assert_eq!(safe_title("Costillar"), "Costillar");
    }
}
