//! Content shaping for index entries.
//!
//! Strips markup from the raw event fields, builds the fixed newline-joined
//! body, seeds the additional-field map and runs the registered hooks.

use serde_json::json;

use crate::error::{IndexError, Result};
use crate::hooks::HookRegistry;
use crate::models::{AdditionalFields, EventRecord};

/// Title, body and teaser of an entry after markup stripping and hook
/// processing, plus the open additional-field map.
#[derive(Debug, Clone)]
pub struct IndexContent {
    pub title: String,
    pub body: String,
    pub teaser: String,
    pub additional: AdditionalFields,
}

/// Shapes one event into indexable content.
///
/// All four text fields are stripped of markup before anything else. The
/// body is the fixed `title\nteaser\ndescription\nprogram` join, with empty
/// segments preserved, so a record with an empty teaser still carries its
/// separator. The additional-field map is seeded with `sortdate` (creation
/// timestamp), `orig_uid` and `orig_pid` before any hook runs.
///
/// Hooks run in registration order, additional-fields hooks first, then
/// index-content hooks. Hook errors propagate and abort the pass.
pub fn transform_event(event: &EventRecord, hooks: &HookRegistry) -> Result<IndexContent> {
    let mut title = strip_tags(&event.title);
    let mut teaser = strip_tags(&event.teaser);
    let description = strip_tags(&event.description);
    let program = strip_tags(&event.program);

    let mut body = format!("{title}\n{teaser}\n{description}\n{program}");

    let mut additional = AdditionalFields::new();
    additional.insert("sortdate".to_string(), json!(event.created_at));
    additional.insert("orig_uid".to_string(), json!(event.uid));
    additional.insert("orig_pid".to_string(), json!(event.pid));

    for hook in hooks.additional_fields() {
        hook.modify(&mut additional, event)
            .map_err(|source| IndexError::Hook {
                hook: hook.name().to_string(),
                source,
            })?;
    }

    for hook in hooks.index_content() {
        hook.modify(&mut title, &mut body, &mut teaser, event)
            .map_err(|source| IndexError::Hook {
                hook: hook.name().to_string(),
                source,
            })?;
    }

    Ok(IndexContent {
        title,
        body,
        teaser,
        additional,
    })
}

/// Removes `<...>` markup from `text`.
///
/// Event fields hold tag-soup HTML, not well-formed XML, so this is a plain
/// scanner: everything from a `<` to the next `>` is dropped, an unclosed
/// trailing tag is dropped to end of input, and a bare `>` outside a tag is
/// kept. Entities are left untouched.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    use crate::hooks::{AdditionalFieldsHook, IndexContentHook};

    fn event() -> EventRecord {
        EventRecord {
            uid: 5,
            pid: 12,
            title: "<b>Summer</b> Festival".to_string(),
            teaser: "<p>Open air</p>".to_string(),
            description: "Music<br/>and food".to_string(),
            program: "".to_string(),
            created_at: 1_700_000_000,
            start_date: 1_700_100_000,
            end_date: 1_700_200_000,
            visible_from: 0,
            visible_until: 0,
            access_groups: String::new(),
            language: 0,
        }
    }

    #[test]
    fn test_strip_tags_removes_markup() {
        assert_eq!(strip_tags("<b>Summer</b> Festival"), "Summer Festival");
        assert_eq!(strip_tags("no markup"), "no markup");
        assert_eq!(strip_tags("a <span class=\"x\">b</span> c"), "a b c");
    }

    #[test]
    fn test_strip_tags_edge_cases() {
        // Unclosed trailing tag is dropped to end of input
        assert_eq!(strip_tags("text <unclosed"), "text ");
        // A bare '>' outside a tag survives
        assert_eq!(strip_tags("2 > 1"), "2 > 1");
        assert_eq!(strip_tags(""), "");
    }

    #[test]
    fn test_body_is_fixed_newline_join_with_empty_segments() {
        let hooks = HookRegistry::new();
        let content = transform_event(&event(), &hooks).unwrap();
        // program is empty but its segment is preserved
        assert_eq!(content.body, "Summer Festival\nOpen air\nMusicand food\n");
        assert_eq!(content.title, "Summer Festival");
        assert_eq!(content.teaser, "Open air");
    }

    #[test]
    fn test_additional_fields_seeded() {
        let hooks = HookRegistry::new();
        let content = transform_event(&event(), &hooks).unwrap();
        assert_eq!(content.additional["sortdate"], 1_700_000_000);
        assert_eq!(content.additional["orig_uid"], 5);
        assert_eq!(content.additional["orig_pid"], 12);
    }

    struct AppendField(&'static str);

    impl AdditionalFieldsHook for AppendField {
        fn name(&self) -> &str {
            self.0
        }

        fn modify(&self, fields: &mut AdditionalFields, _event: &EventRecord) -> anyhow::Result<()> {
            let order = fields
                .get("order")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            fields.insert("order".to_string(), json!(format!("{order}{}", self.0)));
            Ok(())
        }
    }

    struct UppercaseTitle;

    impl IndexContentHook for UppercaseTitle {
        fn name(&self) -> &str {
            "uppercase_title"
        }

        fn modify(
            &self,
            title: &mut String,
            body: &mut String,
            _teaser: &mut String,
            _event: &EventRecord,
        ) -> anyhow::Result<()> {
            *title = title.to_uppercase();
            body.push_str("\nextra");
            Ok(())
        }
    }

    #[test]
    fn test_hooks_run_in_registration_order_and_mutate() {
        let mut hooks = HookRegistry::new();
        hooks.register_additional_fields(Box::new(AppendField("a")));
        hooks.register_additional_fields(Box::new(AppendField("b")));
        hooks.register_index_content(Box::new(UppercaseTitle));

        let content = transform_event(&event(), &hooks).unwrap();
        assert_eq!(content.additional["order"], "ab");
        assert_eq!(content.title, "SUMMER FESTIVAL");
        assert!(content.body.ends_with("\nextra"));
    }

    struct FailingHook;

    impl AdditionalFieldsHook for FailingHook {
        fn name(&self) -> &str {
            "failing"
        }

        fn modify(&self, _fields: &mut AdditionalFields, _event: &EventRecord) -> anyhow::Result<()> {
            bail!("boom")
        }
    }

    #[test]
    fn test_hook_failure_propagates() {
        let mut hooks = HookRegistry::new();
        hooks.register_additional_fields(Box::new(FailingHook));

        let err = transform_event(&event(), &hooks).unwrap_err();
        match err {
            IndexError::Hook { hook, .. } => assert_eq!(hook, "failing"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
