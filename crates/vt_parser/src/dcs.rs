//! Classifies an accumulated DCS payload into a `vt_msg::MessageKind`.
//!
//! Only DECRQSS (`$q` + selector) is interpreted; every other DCS string
//! (macro definitions, Sixel, ReGIS) falls through to `RequestUnknown`,
//! consistent with the sixel/ReGIS non-goal.

use vt_msg::{DcsMessage, MessageKind};

pub(crate) fn classify(payload: &[u8]) -> (MessageKind, bool) {
    if let Some(selector) = payload.strip_prefix(b"$q") {
        let selector = String::from_utf8_lossy(selector).into_owned();
        return match selector.as_str() {
            "m" => (MessageKind::Dcs(DcsMessage::RequestSgr), true),
            "r" => (MessageKind::Dcs(DcsMessage::RequestScrollRegion), true),
            _ => (MessageKind::Dcs(DcsMessage::RequestUnknown(selector)), false),
        };
    }
    (MessageKind::Unknown, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrqss_sgr_selector() {
        let (kind, implemented) = classify(b"$qm");
        assert!(implemented);
        assert_eq!(kind, MessageKind::Dcs(DcsMessage::RequestSgr));
    }

    #[test]
    fn unrelated_dcs_string_is_unknown() {
        let (kind, implemented) = classify(b"0;1;0q#0;2;0;0;0");
        assert!(!implemented);
        assert_eq!(kind, MessageKind::Unknown);
    }
}
