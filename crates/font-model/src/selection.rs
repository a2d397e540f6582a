use crate::registry::{FontRegistry, UNICODE_KEY};
use crate::script::ScriptClassifier;
use crate::segment::TextUnit;

/// The font shared by every non-blank unit, or `None` for a mixed selection.
pub fn selection_font(units: &[TextUnit]) -> Option<&str> {
    let mut fonts = units.iter().filter(|unit| !unit.is_blank()).map(|unit| unit.font_name.as_str());
    let first = fonts.next()?;
    fonts.all(|font| font == first).then_some(first)
}

/// Whether the conversion menu should be offered for this selection at all.
pub fn is_convertible_selection(registry: &FontRegistry, units: &[TextUnit]) -> bool {
    let classifier = ScriptClassifier::new(registry);
    units
        .iter()
        .filter(|unit| !unit.is_blank())
        .any(|unit| classifier.is_nepali_encoded(&unit.font_name, &unit.text))
}

/// Menu labels to offer as conversion targets: every registered font except
/// the one the selection is already in.
pub fn eligible_target_fonts<'a>(registry: &'a FontRegistry, units: &[TextUnit]) -> Vec<&'a str> {
    let current = current_label(registry, units);
    registry.all_labels().into_iter().filter(|label| Some(*label) != current).collect()
}

fn current_label<'a>(registry: &'a FontRegistry, units: &[TextUnit]) -> Option<&'a str> {
    let font = selection_font(units)?;

    if let Some(key) = registry.canonical_key_of(font).filter(|key| !key.is_unicode()) {
        return Some(registry.label_of(key.as_str()));
    }

    is_convertible_selection(registry, units).then(|| registry.label_of(UNICODE_KEY))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(start: usize, text: &str, font: &str) -> TextUnit {
        TextUnit {
            start,
            end: start + text.chars().count(),
            text: text.to_owned(),
            font_name: font.to_owned(),
        }
    }

    #[test]
    fn mixed_fonts_have_no_selection_font() {
        let units = vec![unit(0, "g]kfnL", "Preeti"), unit(6, " ", "Arial"), unit(7, "x", "Arial")];
        assert_eq!(selection_font(&units), None);

        let units = vec![unit(0, "g]kfnL", "Preeti"), unit(6, " ", "Arial")];
        assert_eq!(selection_font(&units), Some("Preeti"));
    }

    #[test]
    fn legacy_selection_excludes_its_own_label() {
        let registry = FontRegistry::builtin();
        let units = vec![unit(0, "g]kfnL", "Preeti")];
        let targets = eligible_target_fonts(&registry, &units);

        assert_eq!(targets.len(), registry.len() - 1);
        assert!(!targets.contains(&"प्रीति"));
        assert!(targets.contains(&"यूनिकोड"));
    }

    #[test]
    fn unicode_selection_excludes_unicode_label() {
        let registry = FontRegistry::builtin();
        let units = vec![unit(0, "नेपाली", "Mangal")];
        let targets = eligible_target_fonts(&registry, &units);

        assert!(!targets.contains(&"यूनिकोड"));
        assert!(targets.contains(&"प्रीति"));
    }

    #[test]
    fn mixed_selection_offers_everything() {
        let registry = FontRegistry::builtin();
        let units = vec![unit(0, "g]kfnL", "Preeti"), unit(6, "नेपाली", "Mangal")];

        assert_eq!(eligible_target_fonts(&registry, &units), registry.all_labels());
    }

    #[test]
    fn latin_only_selection_is_not_convertible() {
        let registry = FontRegistry::builtin();

        assert!(!is_convertible_selection(&registry, &[unit(0, "hello", "Arial")]));
        assert!(!is_convertible_selection(&registry, &[unit(0, "   ", "Preeti")]));
        assert!(is_convertible_selection(
            &registry,
            &[unit(0, "hello", "Arial"), unit(5, "g]kfnL", "Kantipur")]
        ));
    }
}
