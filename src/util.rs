use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

pub fn short_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_owned();
    }

    let kept = label.chars().take(max_chars.saturating_sub(1)).collect::<String>();
    format!("{kept}…")
}

/// Deterministic hue in `[0, 1)` so a label keeps its colour across redraws.
pub fn stable_hue(label: &str) -> f32 {
    let mut hasher = DefaultHasher::new();
    label.hash(&mut hasher);
    let hash = hasher.finish();

    ((hash & 0xffff_ffff) as f64 / (u32::MAX as f64 + 1.0)) as f32
}

pub fn selection_summary(selected: Option<&[String]>, available: usize) -> String {
    match selected {
        None => "not set".to_owned(),
        Some([]) => "none".to_owned(),
        Some([only]) => only.clone(),
        Some(values) if values.len() == available => format!("all {available}"),
        Some(values) => format!("{} of {available}", values.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_grouped_by_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(12_345_678), "12,345,678");
    }

    #[test]
    fn long_labels_are_shortened() {
        assert_eq!(short_label("T-72", 8), "T-72");
        assert_eq!(short_label("BMP-2 infantry fighting vehicle", 6), "BMP-2…");
    }

    #[test]
    fn hue_is_stable_and_bounded() {
        let hue = stable_hue("Uralvagonzavod");
        assert_eq!(hue, stable_hue("Uralvagonzavod"));
        assert!((0.0..1.0).contains(&hue));
    }

    #[test]
    fn summaries_describe_selection_size() {
        let values = vec!["tank".to_owned(), "helicopter".to_owned()];
        assert_eq!(selection_summary(None, 4), "not set");
        assert_eq!(selection_summary(Some(&values[..0]), 4), "none");
        assert_eq!(selection_summary(Some(&values[..1]), 4), "tank");
        assert_eq!(selection_summary(Some(values.as_slice()), 2), "all 2");
        assert_eq!(selection_summary(Some(values.as_slice()), 4), "2 of 4");
    }
}
