use chrono::{NaiveDate, TimeZone, Utc};
use noreply_core::{
    build_draft_prompt, draft_follow_up_notes, Category, DocumentStore, DraftError,
    DraftFlowError, DraftGenerator, DraftRequest, FollowUp, FollowUpService, FollowUpStatus,
    MemorySubstrate, Platform, Priority, SequentialIdGenerator, ServiceError, Tone,
    DRAFT_FALLBACK_TEXT,
};
use std::cell::RefCell;

struct ScriptedGenerator {
    reply: Result<String, DraftError>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(reply: Result<String, DraftError>) -> Self {
        Self {
            reply,
            prompts: RefCell::new(Vec::new()),
        }
    }
}

impl DraftGenerator for ScriptedGenerator {
    fn generate(&self, request: &DraftRequest) -> Result<String, DraftError> {
        self.prompts.borrow_mut().push(build_draft_prompt(request));
        self.reply.clone()
    }
}

fn seeded_service_record() -> FollowUp {
    FollowUp {
        id: "lead-1".to_string(),
        title: "Pricing follow-up".to_string(),
        recipient: "Casey".to_string(),
        platform: Platform::Email,
        status: FollowUpStatus::Pending,
        priority: Priority::High,
        category: Category::Sales,
        due_date: NaiveDate::from_ymd_opt(2024, 11, 2).unwrap(),
        notes: "original notes".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 10, 20, 12, 0, 0).unwrap(),
        media_url: None,
    }
}

fn request() -> DraftRequest {
    DraftRequest {
        recipient_name: "Casey".to_string(),
        context: "Shared pricing sheet on Monday".to_string(),
        tone: Tone::Professional,
    }
}

#[test]
fn successful_draft_is_stored_as_notes() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("d");
    let service = FollowUpService::new(&store, &id_gen);
    service.upsert(seeded_service_record()).unwrap();
    let generator = ScriptedGenerator::new(Ok("  Hi Casey, any thoughts on pricing?  ".into()));

    let updated = draft_follow_up_notes(&generator, &service, "lead-1", &request()).unwrap();

    assert_eq!(updated.notes, "Hi Casey, any thoughts on pricing?");
    assert_eq!(service.get("lead-1").unwrap(), Some(updated));
    let prompts = generator.prompts.borrow();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(Tone::Professional.style_instruction()));
}

#[test]
fn blank_draft_falls_back_to_fixed_text() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("d");
    let service = FollowUpService::new(&store, &id_gen);
    service.upsert(seeded_service_record()).unwrap();
    let generator = ScriptedGenerator::new(Ok("   ".into()));

    let updated = draft_follow_up_notes(&generator, &service, "lead-1", &request()).unwrap();
    assert_eq!(updated.notes, DRAFT_FALLBACK_TEXT);
}

#[test]
fn generator_failure_leaves_state_untouched() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("d");
    let service = FollowUpService::new(&store, &id_gen);
    service.upsert(seeded_service_record()).unwrap();
    let before = service.list().unwrap();
    let generator = ScriptedGenerator::new(Err(DraftError::Offline("timeout".into())));

    let err = draft_follow_up_notes(&generator, &service, "lead-1", &request()).unwrap_err();

    assert!(matches!(err, DraftFlowError::Draft(DraftError::Offline(_))));
    assert_eq!(service.list().unwrap(), before);
}

#[test]
fn drafting_for_missing_follow_up_is_not_found() {
    let substrate = MemorySubstrate::new();
    let store = DocumentStore::new(&substrate);
    let id_gen = SequentialIdGenerator::new("d");
    let service = FollowUpService::new(&store, &id_gen);
    let generator = ScriptedGenerator::new(Ok("text".into()));

    let err = draft_follow_up_notes(&generator, &service, "nope", &request()).unwrap_err();
    assert!(matches!(
        err,
        DraftFlowError::Service(ServiceError::NotFound(_))
    ));
}
