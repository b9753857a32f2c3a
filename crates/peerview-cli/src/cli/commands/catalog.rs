//! Prints every global event kind with the subtypes of composite families.

use peerview_core::events::EventKind;

pub fn print() {
    for line in lines() {
        println!("{line}");
    }
}

fn lines() -> Vec<String> {
    EventKind::ALL
        .iter()
        .map(|&kind| {
            let subtypes = kind.subtypes();
            if subtypes.is_empty() {
                kind.to_string()
            } else {
                format!("{:<28}{}", kind.as_str(), subtypes.join(" "))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_line_per_kind() {
        let lines = lines();
        assert_eq!(lines.len(), EventKind::ALL.len());
        assert_eq!(lines[0], "localizationLoaded");
    }

    #[test]
    fn test_composite_lists_subtypes() {
        let line = lines()
            .into_iter()
            .find(|l| l.starts_with("contactScreenUpdate"))
            .unwrap();
        assert!(line.ends_with("changeTab scrollToTop activityUpdates connectionsUpdates"));
    }
}
