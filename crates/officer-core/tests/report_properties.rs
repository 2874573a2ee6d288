//! Property tests for report merging and path rendering.

use officer_core::{flatten, DocPath, Message, Report, Segment};
use proptest::prelude::*;

fn report_named(name: &str, messages: &[String]) -> Report {
    let mut report = Report::new(name);
    for message in messages {
        report.add_message(message.clone());
    }
    report
}

proptest! {
    /// Same-named children never duplicate; their messages concatenate in order.
    #[test]
    fn merge_concatenates_without_duplicates(
        names in proptest::collection::vec("[a-c]", 1..12),
        text in "[a-z]{1,8}",
    ) {
        let mut root = Report::new("root");
        for (i, name) in names.iter().enumerate() {
            root.add_child(report_named(name, &[format!("{text}{i}")]));
        }

        let mut distinct: Vec<&String> = Vec::new();
        for name in &names {
            if !distinct.contains(&name) {
                distinct.push(name);
            }
        }
        prop_assert_eq!(root.children().len(), distinct.len());

        for name in distinct {
            let expected: Vec<String> = names
                .iter()
                .enumerate()
                .filter(|(_, n)| *n == name)
                .map(|(i, _)| format!("{text}{i}"))
                .collect();
            let child = root.child(name).unwrap();
            prop_assert_eq!(child.own_messages(), expected.as_slice());
        }
        prop_assert_eq!(root.count(), names.len());
    }

    /// Grandchildren merge recursively when their parents share a name.
    #[test]
    fn merge_recurses_into_grandchildren(count in 1usize..6) {
        let mut root = Report::new("root");
        for i in 0..count {
            let mut parent = Report::new("items");
            parent.add_child(report_named("0", &[format!("m{i}")]));
            root.add_child(parent);
        }
        let items = root.child("items").unwrap();
        prop_assert_eq!(items.children().len(), 1);
        prop_assert_eq!(items.child("0").unwrap().own_messages().len(), count);
    }

    /// Flattened paths never start with a separator dot and contain one
    /// rendered piece per segment.
    #[test]
    fn flatten_renders_every_segment(
        keys in proptest::collection::vec("[a-z][a-z0-9_]{0,6}", 0..6),
        index in 0usize..50,
    ) {
        let mut path = DocPath::root("root");
        for key in &keys {
            path = path.child(key.as_str());
        }
        path = path.child(index);
        let flat = flatten(&path);

        prop_assert!(flat.starts_with("root"));
        let expected_index = format!("[{index}]");
        prop_assert!(flat.ends_with(&expected_index));
        prop_assert_eq!(flat.matches('.').count(), keys.len());
        prop_assert_eq!(path.segments().last(), Some(&Segment::Index(index)));
    }
}

#[test]
fn test_messages_order_own_then_children() {
    let mut root = Report::new("root");
    root.add_child(report_named("b", &["child".to_string()]));
    root.add_message("own");
    let messages = root.messages();
    assert_eq!(messages[0], Message::Text("own".into()));
    assert!(matches!(&messages[1], Message::Block { name, .. } if name == "b"));
}
