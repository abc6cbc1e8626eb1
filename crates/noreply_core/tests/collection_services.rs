use chrono::{NaiveDate, TimeZone, Utc};
use noreply_core::db::open_db_in_memory;
use noreply_core::{
    default_rules, default_templates, AutomationRule, AutomationRuleDraft, AutomationRuleService,
    Category, CollectionKey, DocumentStore, FollowUp, FollowUpDraft, FollowUpService,
    FollowUpStatus, Identified, KvSubstrate, MemorySubstrate, Platform, Priority, RecordValidationError,
    SequentialIdGenerator, ServiceError, SqliteSubstrate, Template, TemplateDraft,
    TemplateService, Tone, UpsertOutcome,
};

fn follow_up(id: &str, title: &str) -> FollowUp {
    FollowUp {
        id: id.to_string(),
        title: title.to_string(),
        recipient: "Alex".to_string(),
        platform: Platform::Email,
        status: FollowUpStatus::Pending,
        priority: Priority::Medium,
        category: Category::Work,
        due_date: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
        notes: String::new(),
        created_at: Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap(),
        media_url: None,
    }
}

fn rule(id: &str, name: &str) -> AutomationRule {
    AutomationRule {
        id: id.to_string(),
        name: name.to_string(),
        trigger_days: 5,
        tone: Tone::Casual,
        enabled: true,
    }
}

fn template(id: &str, name: &str) -> Template {
    Template {
        id: id.to_string(),
        name: name.to_string(),
        content: "Hello [Name]".to_string(),
        tone: Tone::Professional,
    }
}

fn ids(records: &[impl Identified]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.record_id().to_string())
        .collect()
}

#[test]
fn follow_up_upsert_roundtrips_deep_equal() {
    let conn = open_db_in_memory().unwrap();
    let store = DocumentStore::new(SqliteSubstrate::new(&conn));
    let id_gen = SequentialIdGenerator::new("fu");
    let service = FollowUpService::new(&store, &id_gen);

    let mut record = follow_up("a", "Send deck");
    record.media_url = Some("https://example.com/deck.pdf".to_string());
    assert_eq!(service.upsert(record.clone()).unwrap(), UpsertOutcome::Inserted);

    assert_eq!(service.list().unwrap(), vec![record.clone()]);
    assert_eq!(service.get("a").unwrap(), Some(record));
}

#[test]
fn follow_ups_have_no_default_seed() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("fu");
    let service = FollowUpService::new(&store, &id_gen);

    assert!(service.list().unwrap().is_empty());
    assert!(substrate.is_empty());
}

#[test]
fn follow_ups_are_prepended_rules_and_templates_appended() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("x");

    let follow_ups = FollowUpService::new(&store, &id_gen);
    follow_ups.upsert(follow_up("a", "first")).unwrap();
    follow_ups.upsert(follow_up("b", "second")).unwrap();
    assert_eq!(ids(&follow_ups.list().unwrap()), vec!["b", "a"]);

    let rules = AutomationRuleService::new(&store, &id_gen);
    rules.upsert(rule("a", "first")).unwrap();
    rules.upsert(rule("b", "second")).unwrap();
    assert_eq!(ids(&rules.list().unwrap()), vec!["1", "2", "a", "b"]);

    let templates = TemplateService::new(&store, &id_gen);
    templates.upsert(template("a", "first")).unwrap();
    templates.upsert(template("b", "second")).unwrap();
    assert_eq!(ids(&templates.list().unwrap()), vec!["1", "a", "b"]);
}

#[test]
fn repeated_identical_upsert_is_idempotent() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("x");
    let service = FollowUpService::new(&store, &id_gen);

    service.upsert(follow_up("a", "one")).unwrap();
    service.upsert(follow_up("b", "two")).unwrap();
    let before = service.list().unwrap();

    assert_eq!(
        service.upsert(follow_up("a", "one")).unwrap(),
        UpsertOutcome::Replaced
    );
    assert_eq!(service.list().unwrap(), before);
}

#[test]
fn upsert_with_same_id_replaces_in_place() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("x");
    let rules = AutomationRuleService::new(&store, &id_gen);

    rules.upsert(rule("x", "v1")).unwrap();
    rules.upsert(rule("y", "other")).unwrap();
    let mut v2 = rule("x", "v2");
    v2.trigger_days = 9;
    v2.enabled = false;
    rules.upsert(v2.clone()).unwrap();

    let listed = rules.list().unwrap();
    let matching: Vec<&AutomationRule> = listed.iter().filter(|r| r.id == "x").collect();
    assert_eq!(matching, vec![&v2]);
    assert_eq!(ids(&listed), vec!["1", "2", "x", "y"]);
}

#[test]
fn replacing_a_follow_up_keeps_original_created_at() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("x");
    let service = FollowUpService::new(&store, &id_gen);
    let original = follow_up("a", "draft");
    service.upsert(original.clone()).unwrap();

    let mut edited = follow_up("a", "edited");
    edited.created_at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    service.upsert(edited).unwrap();

    let stored = service.get("a").unwrap().unwrap();
    assert_eq!(stored.title, "edited");
    assert_eq!(stored.created_at, original.created_at);
}

#[test]
fn delete_removes_present_and_ignores_absent() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("x");
    let templates = TemplateService::new(&store, &id_gen);
    templates.upsert(template("a", "A")).unwrap();

    assert!(templates.delete("a").unwrap());
    let after_delete = templates.list().unwrap();
    assert_eq!(ids(&after_delete), vec!["1"]);

    assert!(!templates.delete("missing").unwrap());
    assert_eq!(templates.list().unwrap(), after_delete);
}

#[test]
fn rules_seed_once_on_fresh_substrate() {
    let conn = open_db_in_memory().unwrap();
    let store = DocumentStore::new(SqliteSubstrate::new(&conn));
    let id_gen = SequentialIdGenerator::new("r");
    let rules = AutomationRuleService::new(&store, &id_gen);

    let first = rules.list().unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].name, "Standard 3-Day Ping");
    assert_eq!(first[0].trigger_days, 3);
    assert_eq!(first[0].tone, Tone::Polite);
    assert!(first[0].enabled);
    assert_eq!(first[1].name, "Urgent 7-Day Push");
    assert_eq!(first[1].trigger_days, 7);
    assert_eq!(first[1].tone, Tone::Urgent);
    assert!(!first[1].enabled);

    let raw = store
        .substrate()
        .get(CollectionKey::AutomationRules.storage_key())
        .unwrap();
    assert!(raw.is_some(), "seed must be persisted");
    assert_eq!(rules.list().unwrap(), first);
    assert_eq!(rules.enabled_count().unwrap(), 1);
}

#[test]
fn templates_seed_single_default() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("t");
    let templates = TemplateService::new(&store, &id_gen);

    let listed = templates.list().unwrap();
    assert_eq!(listed, default_templates());
    assert_eq!(listed[0].name, "Standard Follow-up");
    assert_eq!(
        listed[0].content,
        "Hi [Name], just checking in on our previous conversation."
    );
    assert_eq!(listed[0].tone, Tone::Polite);
    assert_eq!(templates.list().unwrap(), listed);
}

#[test]
fn peek_shows_defaults_without_writing() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("p");

    assert_eq!(
        AutomationRuleService::new(&store, &id_gen).peek().unwrap(),
        default_rules()
    );
    assert_eq!(
        TemplateService::new(&store, &id_gen).peek().unwrap(),
        default_templates()
    );
    assert!(substrate.is_empty());
}

#[test]
fn corrupted_collections_list_as_empty() {
    let substrate = MemorySubstrate::new();
    for key in CollectionKey::ALL {
        substrate.set(key.storage_key(), "not json at all").unwrap();
    }
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("c");

    assert!(FollowUpService::new(&store, &id_gen).list().unwrap().is_empty());
    assert!(AutomationRuleService::new(&store, &id_gen)
        .list()
        .unwrap()
        .is_empty());
    assert!(TemplateService::new(&store, &id_gen).list().unwrap().is_empty());
}

#[test]
fn rule_with_null_trigger_days_does_not_erase_valid_rules() {
    let substrate = MemorySubstrate::new();
    substrate
        .set(
            CollectionKey::AutomationRules.storage_key(),
            &serde_json::json!([
                {"id": "1", "name": "Keep me", "triggerDays": 3, "tone": "polite", "enabled": true},
                {"id": "x", "name": "Blank days", "triggerDays": null, "tone": "casual", "enabled": true}
            ])
            .to_string(),
        )
        .unwrap();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("r");
    let service = AutomationRuleService::new(&store, &id_gen);

    let before = service.list().unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].name, "Keep me");

    service
        .create(AutomationRuleDraft {
            name: "New".to_string(),
            trigger_days: 2,
            tone: Tone::Casual,
        })
        .unwrap();

    let names: Vec<String> = service
        .list()
        .unwrap()
        .into_iter()
        .map(|rule| rule.name)
        .collect();
    assert_eq!(names, vec!["Keep me".to_string(), "New".to_string()]);
}

#[test]
fn create_assigns_injected_ids_and_defaults() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("gen");

    let created = FollowUpService::new(&store, &id_gen)
        .create(FollowUpDraft {
            title: "Check in".to_string(),
            recipient: "Robin".to_string(),
            platform: Platform::WhatsApp,
            priority: Priority::High,
            category: Category::Networking,
            due_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            notes: String::new(),
            media_url: None,
        })
        .unwrap();
    assert_eq!(created.id, "gen-1");
    assert_eq!(created.status, FollowUpStatus::Pending);
    assert!(created.created_at <= Utc::now());

    let rule = AutomationRuleService::new(&store, &id_gen)
        .create(AutomationRuleDraft {
            name: "Weekly".to_string(),
            trigger_days: 7,
            tone: Tone::Creative,
        })
        .unwrap();
    assert_eq!(rule.id, "gen-2");
    assert!(rule.enabled);

    let template = TemplateService::new(&store, &id_gen)
        .create(TemplateDraft {
            name: "Short".to_string(),
            content: "Any update, [Name]?".to_string(),
            tone: Tone::Short,
        })
        .unwrap();
    assert_eq!(template.id, "gen-3");
}

#[test]
fn invalid_records_are_rejected_before_writing() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("v");
    let rules = AutomationRuleService::new(&store, &id_gen);

    let mut zero = rule("z", "zero");
    zero.trigger_days = 0;
    let err = rules.upsert(zero).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(RecordValidationError::NonPositiveTriggerDays)
    ));
    assert!(substrate.is_empty());

    let err = FollowUpService::new(&store, &id_gen)
        .upsert(follow_up("", "no id"))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(RecordValidationError::EmptyId)
    ));
}

#[test]
fn unavailable_substrate_is_reported_as_recoverable() {
    let substrate = MemorySubstrate::with_quota(10);
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("q");
    let service = FollowUpService::new(&store, &id_gen);

    let err = service.upsert(follow_up("a", "too big")).unwrap_err();
    assert!(err.is_persistence_unavailable());
    assert!(err.substrate_error().is_some());
    assert!(service.list().unwrap().is_empty());
}

#[test]
fn set_helpers_replace_whole_records() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("s");
    let follow_ups = FollowUpService::new(&store, &id_gen);
    follow_ups.upsert(follow_up("a", "A")).unwrap();

    let updated = follow_ups.set_notes("a", "Drafted reply").unwrap();
    assert_eq!(updated.notes, "Drafted reply");
    let updated = follow_ups.set_status("a", FollowUpStatus::Completed).unwrap();
    assert_eq!(updated.notes, "Drafted reply");
    assert_eq!(follow_ups.get("a").unwrap(), Some(updated));

    let err = follow_ups.set_notes("missing", "x").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(id) if id == "missing"));

    let rules = AutomationRuleService::new(&store, &id_gen);
    let toggled = rules.set_enabled("2", true).unwrap();
    assert!(toggled.enabled);
    assert_eq!(rules.enabled_count().unwrap(), 2);
}

#[test]
fn stats_and_recent_pending_follow_collection_order() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("st");
    let service = FollowUpService::new(&store, &id_gen);

    assert_eq!(service.stats().unwrap().success_rate_percent, 0);

    for (id, status) in [
        ("a", FollowUpStatus::Completed),
        ("b", FollowUpStatus::Pending),
        ("c", FollowUpStatus::Overdue),
        ("d", FollowUpStatus::Pending),
        ("e", FollowUpStatus::Completed),
        ("f", FollowUpStatus::Pending),
    ] {
        let mut record = follow_up(id, id);
        record.status = status;
        service.upsert(record).unwrap();
    }

    let stats = service.stats().unwrap();
    assert_eq!(stats.total, 6);
    assert_eq!(stats.pending, 3);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.overdue, 1);
    assert_eq!(stats.success_rate_percent, 33);

    assert_eq!(ids(&service.recent_pending(2).unwrap()), vec!["f", "d"]);
}
