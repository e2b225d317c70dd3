use bytes::Bytes;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task;
use tracing::{info, warn};

use crate::document::{DocumentProcessor, WatermarkPosition, WatermarkSpec};
use crate::error::{ProcessingError, StorageError, ValidationError};
use crate::session::{FlowState, Session, SessionField, SessionStore};
use crate::storage::{sanitize_file_name, Workspace};

use super::events::{Action, Event, Reply, MAX_FILE_SIZE, OPACITY_CHOICES};

/// Drives one user's conversation through the flow states. Stateless
/// itself; everything per-user lives in the session store.
pub struct ConversationController {
    store: Arc<dyn SessionStore>,
    workspace: Arc<Workspace>,
    processor: DocumentProcessor,
}

impl ConversationController {
    pub fn new(
        store: Arc<dyn SessionStore>,
        workspace: Arc<Workspace>,
        processor: DocumentProcessor,
    ) -> Self {
        Self {
            store,
            workspace,
            processor,
        }
    }

    /// Handle one inbound event. Validation problems and processing
    /// failures become replies; only storage failures propagate as
    /// errors.
    pub async fn handle(&self, user_id: &str, event: Event) -> Result<Vec<Reply>, StorageError> {
        let session = self.store.get(user_id).await?;
        match event {
            Event::Start | Event::Cancel | Event::SelectAction(Action::Cancel) => {
                self.reset(user_id).await?;
                Ok(vec![Reply::Menu])
            }
            Event::SelectAction(Action::Help) => Ok(vec![Reply::Help]),
            Event::SelectAction(action) => self.begin(user_id, action).await,
            Event::UploadDocument {
                file_name,
                size_bytes,
                data,
            } => {
                self.on_upload(user_id, &session, file_name, size_bytes, data)
                    .await
            }
            Event::TextInput(text) => self.on_text(user_id, &session, text).await,
            Event::SelectPosition(position) => self.on_position(user_id, &session, position).await,
            Event::SelectOpacity(value) => self.on_opacity(user_id, &session, value).await,
            Event::Complete => self.on_complete(user_id, &session).await,
        }
    }

    /// Drop the session and release any files it was holding.
    async fn reset(&self, user_id: &str) -> Result<(), StorageError> {
        let files = self.store.clear(user_id).await?;
        self.workspace.remove_files(&files).await;
        Ok(())
    }

    async fn begin(&self, user_id: &str, action: Action) -> Result<Vec<Reply>, StorageError> {
        // Selecting an operation abandons whatever was in flight.
        self.reset(user_id).await?;
        let (state, reply) = match action {
            Action::Merge => (FlowState::MergeCollecting, Reply::MergeIntro),
            Action::Rename => (FlowState::RenameAwaitFile, Reply::RenameIntro),
            Action::Watermark => (FlowState::WatermarkAwaitFile, Reply::WatermarkIntro),
            Action::Help | Action::Cancel => unreachable!("handled before dispatch"),
        };
        self.store.set_state(user_id, state).await?;
        Ok(vec![reply])
    }

    async fn on_upload(
        &self,
        user_id: &str,
        session: &Session,
        file_name: String,
        size_bytes: u64,
        data: Bytes,
    ) -> Result<Vec<Reply>, StorageError> {
        // State first, then validation: an upload with no operation
        // selected is a usage problem, not a bad file.
        if session.state == FlowState::Idle {
            return Ok(vec![Reply::NoActiveOperation]);
        }
        let accepts_file = matches!(
            session.state,
            FlowState::MergeCollecting | FlowState::RenameAwaitFile | FlowState::WatermarkAwaitFile
        );
        if !accepts_file {
            return Ok(vec![Reply::RestartPrompt]);
        }
        if let Some(rejection) = validate_upload(&file_name, size_bytes) {
            return Ok(vec![Reply::Invalid(rejection)]);
        }

        let stored = match self.workspace.store_input(user_id, &file_name, &data).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(user_id, "failed to store upload: {e}");
                return Ok(vec![Reply::ProcessingFailed]);
            }
        };
        self.store.append_file(user_id, stored).await?;

        match session.state {
            FlowState::MergeCollecting => {
                let count = self.store.get(user_id).await?.files.len();
                Ok(vec![Reply::MergeFileAdded { count }])
            }
            FlowState::RenameAwaitFile => {
                self.store
                    .set_state(user_id, FlowState::RenameAwaitName)
                    .await?;
                Ok(vec![Reply::AskNewName])
            }
            FlowState::WatermarkAwaitFile => {
                self.store
                    .set_state(user_id, FlowState::WatermarkAwaitText)
                    .await?;
                Ok(vec![Reply::AskWatermarkText])
            }
            _ => unreachable!("guarded above"),
        }
    }

    async fn on_text(
        &self,
        user_id: &str,
        session: &Session,
        text: String,
    ) -> Result<Vec<Reply>, StorageError> {
        match session.state {
            FlowState::RenameAwaitName => {
                let name = strip_pdf_suffix(text.trim());
                if name.is_empty() {
                    return Ok(vec![Reply::Invalid(ValidationError::EmptyName)]);
                }
                self.store
                    .set_field(user_id, SessionField::NewName(name.to_string()))
                    .await?;
                self.finish_rename(user_id, session, name).await
            }
            FlowState::WatermarkAwaitText => {
                self.store
                    .set_field(user_id, SessionField::WatermarkText(text))
                    .await?;
                self.store
                    .set_state(user_id, FlowState::WatermarkAwaitPosition)
                    .await?;
                Ok(vec![Reply::AskWatermarkPosition])
            }
            _ => Ok(vec![Reply::RestartPrompt]),
        }
    }

    async fn on_position(
        &self,
        user_id: &str,
        session: &Session,
        position: WatermarkPosition,
    ) -> Result<Vec<Reply>, StorageError> {
        if session.state != FlowState::WatermarkAwaitPosition {
            return Ok(vec![Reply::RestartPrompt]);
        }
        self.store
            .set_field(user_id, SessionField::WatermarkPosition(position))
            .await?;
        self.store
            .set_state(user_id, FlowState::WatermarkAwaitOpacity)
            .await?;
        Ok(vec![Reply::AskWatermarkOpacity])
    }

    async fn on_opacity(
        &self,
        user_id: &str,
        session: &Session,
        value: f32,
    ) -> Result<Vec<Reply>, StorageError> {
        if session.state != FlowState::WatermarkAwaitOpacity {
            return Ok(vec![Reply::RestartPrompt]);
        }
        if !OPACITY_CHOICES.iter().any(|c| (c - value).abs() < 1e-3) {
            return Ok(vec![Reply::Invalid(ValidationError::UnsupportedOpacity)]);
        }
        self.store
            .set_field(user_id, SessionField::WatermarkOpacity(value))
            .await?;
        self.finish_watermark(user_id, session, value).await
    }

    async fn on_complete(
        &self,
        user_id: &str,
        session: &Session,
    ) -> Result<Vec<Reply>, StorageError> {
        if session.state != FlowState::MergeCollecting {
            return Ok(vec![Reply::RestartPrompt]);
        }
        if session.files.len() < 2 {
            return Ok(vec![Reply::Invalid(ValidationError::NotEnoughFiles)]);
        }

        let inputs: Vec<PathBuf> = session.files.iter().map(|f| f.path.clone()).collect();
        let count = inputs.len();
        let output = self.workspace.output_path(user_id, "merged.pdf");

        let processor = self.processor;
        let out = output.clone();
        let result = run_blocking(move || processor.merge(&inputs, &out)).await;
        self.deliver(
            user_id,
            result,
            output,
            "merged.pdf".to_string(),
            format!("Successfully merged {count} PDFs"),
        )
        .await
    }

    async fn finish_rename(
        &self,
        user_id: &str,
        session: &Session,
        new_name: &str,
    ) -> Result<Vec<Reply>, StorageError> {
        let Some(source) = session.files.first().cloned() else {
            warn!(user_id, "rename reached naming with no file on record");
            self.reset(user_id).await?;
            return Ok(vec![Reply::RestartPrompt]);
        };

        let file_name = format!("{}.pdf", sanitize_file_name(new_name));
        let output = self.workspace.output_path(user_id, &file_name);

        let processor = self.processor;
        let input = source.path.clone();
        let out = output.clone();
        let result = run_blocking(move || processor.rename(&input, &out)).await;
        let caption = format!("File renamed to: {file_name}");
        self.deliver(user_id, result, output, file_name, caption).await
    }

    async fn finish_watermark(
        &self,
        user_id: &str,
        session: &Session,
        opacity: f32,
    ) -> Result<Vec<Reply>, StorageError> {
        let Some(source) = session.files.first().cloned() else {
            warn!(user_id, "watermark reached opacity with no file on record");
            self.reset(user_id).await?;
            return Ok(vec![Reply::RestartPrompt]);
        };

        let text = session.watermark_text.clone().unwrap_or_default();
        let spec = WatermarkSpec {
            text: text.clone(),
            position: session
                .watermark_position
                .unwrap_or(WatermarkPosition::Center),
            opacity,
        };
        let output = self.workspace.output_path(user_id, "watermarked.pdf");

        let processor = self.processor;
        let input = source.path.clone();
        let out = output.clone();
        let result = run_blocking(move || processor.watermark(&input, &out, &spec)).await;
        self.deliver(
            user_id,
            result,
            output,
            "watermarked.pdf".to_string(),
            format!("Watermark added: '{text}'"),
        )
        .await
    }

    /// Read the produced document into memory, release every working
    /// file, clear the session, and hand the bytes to the transport. On
    /// failure the session is left untouched so the user can retry the
    /// last step or cancel.
    async fn deliver(
        &self,
        user_id: &str,
        result: Result<(), ProcessingError>,
        output: PathBuf,
        file_name: String,
        caption: String,
    ) -> Result<Vec<Reply>, StorageError> {
        if let Err(e) = result {
            warn!(user_id, "document processing failed: {e}");
            self.workspace.remove_path(&output).await;
            return Ok(vec![Reply::ProcessingFailed]);
        }
        let data = match tokio::fs::read(&output).await {
            Ok(data) => Bytes::from(data),
            Err(e) => {
                warn!(user_id, "failed to read produced document: {e}");
                self.workspace.remove_path(&output).await;
                return Ok(vec![Reply::ProcessingFailed]);
            }
        };
        self.workspace.remove_path(&output).await;
        self.reset(user_id).await?;
        info!(user_id, file_name, "operation completed");
        Ok(vec![
            Reply::Document {
                file_name,
                data,
                caption,
            },
            Reply::Done,
        ])
    }
}

async fn run_blocking<F>(work: F) -> Result<(), ProcessingError>
where
    F: FnOnce() -> Result<(), ProcessingError> + Send + 'static,
{
    match task::spawn_blocking(work).await {
        Ok(result) => result,
        Err(e) => {
            warn!("processing task failed to complete: {e}");
            Err(ProcessingError::TaskFailed)
        }
    }
}

fn validate_upload(file_name: &str, size_bytes: u64) -> Option<ValidationError> {
    if !file_name.to_lowercase().ends_with(".pdf") {
        return Some(ValidationError::NotPdf);
    }
    if size_bytes > MAX_FILE_SIZE {
        return Some(ValidationError::FileTooLarge);
    }
    None
}

/// Drop a trailing `.pdf` in any letter case; the extension is always
/// re-added on output.
fn strip_pdf_suffix(name: &str) -> &str {
    // The cut point is only a valid char boundary when the name really
    // ends in an ASCII ".pdf"; multibyte names must pass through.
    if name.len() >= 4
        && name.is_char_boundary(name.len() - 4)
        && name[name.len() - 4..].eq_ignore_ascii_case(".pdf")
    {
        &name[..name.len() - 4]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::testutil::sample_pdf_bytes;
    use crate::session::MemorySessionStore;
    use lopdf::Document;

    struct Harness {
        controller: ConversationController,
        store: Arc<MemorySessionStore>,
        workspace: Arc<Workspace>,
        _dir: tempfile::TempDir,
    }

    async fn harness() -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Arc::new(Workspace::create(dir.path().to_path_buf()).await.unwrap());
        let store = Arc::new(MemorySessionStore::new(3600));
        let controller =
            ConversationController::new(store.clone(), workspace.clone(), DocumentProcessor);
        Harness {
            controller,
            store,
            workspace,
            _dir: dir,
        }
    }

    fn upload(name: &str, data: Vec<u8>) -> Event {
        Event::UploadDocument {
            file_name: name.to_string(),
            size_bytes: data.len() as u64,
            data: Bytes::from(data),
        }
    }

    fn workspace_file_count(h: &Harness) -> usize {
        std::fs::read_dir(h.workspace.root()).unwrap().count()
    }

    #[tokio::test]
    async fn start_shows_menu_and_resets() {
        let h = harness().await;
        h.controller
            .handle("u1", Event::SelectAction(Action::Merge))
            .await
            .unwrap();
        assert_eq!(
            h.store.get("u1").await.unwrap().state,
            FlowState::MergeCollecting
        );

        let replies = h.controller.handle("u1", Event::Start).await.unwrap();
        assert_eq!(replies, vec![Reply::Menu]);
        assert_eq!(h.store.get("u1").await.unwrap().state, FlowState::Idle);
    }

    #[tokio::test]
    async fn upload_without_operation_is_rejected() {
        let h = harness().await;
        let replies = h
            .controller
            .handle("u1", upload("a.pdf", sample_pdf_bytes(&[(595.0, 842.0)])))
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::NoActiveOperation]);
        assert_eq!(workspace_file_count(&h), 0);
    }

    #[tokio::test]
    async fn merge_flow_end_to_end() {
        let h = harness().await;
        let replies = h
            .controller
            .handle("u1", Event::SelectAction(Action::Merge))
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::MergeIntro]);

        // Too few files to complete.
        let replies = h
            .controller
            .handle("u1", upload("a.pdf", sample_pdf_bytes(&[(500.0, 700.0)])))
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::MergeFileAdded { count: 1 }]);
        let replies = h.controller.handle("u1", Event::Complete).await.unwrap();
        assert_eq!(
            replies,
            vec![Reply::Invalid(ValidationError::NotEnoughFiles)]
        );

        let replies = h
            .controller
            .handle(
                "u1",
                upload("b.pdf", sample_pdf_bytes(&[(600.0, 800.0), (300.0, 400.0)])),
            )
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::MergeFileAdded { count: 2 }]);

        let replies = h.controller.handle("u1", Event::Complete).await.unwrap();
        let Reply::Document {
            file_name,
            data,
            caption,
        } = &replies[0]
        else {
            panic!("expected a document, got {replies:?}");
        };
        assert_eq!(file_name, "merged.pdf");
        assert_eq!(caption, "Successfully merged 2 PDFs");
        assert_eq!(replies[1], Reply::Done);

        let doc = Document::load_mem(data).unwrap();
        assert_eq!(doc.get_pages().len(), 3);

        // Inputs and output are gone, session is back to idle.
        assert_eq!(workspace_file_count(&h), 0);
        assert_eq!(h.store.get("u1").await.unwrap().state, FlowState::Idle);
    }

    #[tokio::test]
    async fn rename_flow_end_to_end() {
        let h = harness().await;
        h.controller
            .handle("u1", Event::SelectAction(Action::Rename))
            .await
            .unwrap();

        let replies = h
            .controller
            .handle("u1", upload("old.pdf", sample_pdf_bytes(&[(595.0, 842.0)])))
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::AskNewName]);

        // Extension and whitespace in the requested name are tolerated.
        let replies = h
            .controller
            .handle("u1", Event::TextInput("  annual_report.PDF ".to_string()))
            .await
            .unwrap();
        let Reply::Document { file_name, data, .. } = &replies[0] else {
            panic!("expected a document, got {replies:?}");
        };
        assert_eq!(file_name, "annual_report.pdf");
        assert_eq!(&data[..], &sample_pdf_bytes(&[(595.0, 842.0)])[..]);
        assert_eq!(workspace_file_count(&h), 0);
    }

    #[tokio::test]
    async fn rename_rejects_empty_names() {
        let h = harness().await;
        h.controller
            .handle("u1", Event::SelectAction(Action::Rename))
            .await
            .unwrap();
        h.controller
            .handle("u1", upload("old.pdf", sample_pdf_bytes(&[(595.0, 842.0)])))
            .await
            .unwrap();

        for bad in ["   ", ".pdf"] {
            let replies = h
                .controller
                .handle("u1", Event::TextInput(bad.to_string()))
                .await
                .unwrap();
            assert_eq!(replies, vec![Reply::Invalid(ValidationError::EmptyName)]);
        }
        // Still waiting for a usable name.
        assert_eq!(
            h.store.get("u1").await.unwrap().state,
            FlowState::RenameAwaitName
        );
    }

    #[tokio::test]
    async fn watermark_flow_end_to_end() {
        let h = harness().await;
        h.controller
            .handle("u1", Event::SelectAction(Action::Watermark))
            .await
            .unwrap();

        let replies = h
            .controller
            .handle("u1", upload("doc.pdf", sample_pdf_bytes(&[(595.0, 842.0)])))
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::AskWatermarkText]);

        let replies = h
            .controller
            .handle("u1", Event::TextInput("CONFIDENTIAL".to_string()))
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::AskWatermarkPosition]);

        let replies = h
            .controller
            .handle("u1", Event::SelectPosition(WatermarkPosition::Diagonal))
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::AskWatermarkOpacity]);

        // An opacity outside the offered set keeps the session waiting.
        let replies = h
            .controller
            .handle("u1", Event::SelectOpacity(0.42))
            .await
            .unwrap();
        assert_eq!(
            replies,
            vec![Reply::Invalid(ValidationError::UnsupportedOpacity)]
        );
        assert_eq!(
            h.store.get("u1").await.unwrap().state,
            FlowState::WatermarkAwaitOpacity
        );

        let replies = h
            .controller
            .handle("u1", Event::SelectOpacity(0.3))
            .await
            .unwrap();
        let Reply::Document {
            file_name,
            data,
            caption,
        } = &replies[0]
        else {
            panic!("expected a document, got {replies:?}");
        };
        assert_eq!(file_name, "watermarked.pdf");
        assert_eq!(caption, "Watermark added: 'CONFIDENTIAL'");
        assert!(Document::load_mem(data).is_ok());
        assert_eq!(workspace_file_count(&h), 0);
    }

    #[tokio::test]
    async fn uploads_are_validated_before_storing() {
        let h = harness().await;
        h.controller
            .handle("u1", Event::SelectAction(Action::Merge))
            .await
            .unwrap();

        let replies = h
            .controller
            .handle("u1", upload("notes.txt", b"plain text".to_vec()))
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::Invalid(ValidationError::NotPdf)]);

        let replies = h
            .controller
            .handle(
                "u1",
                Event::UploadDocument {
                    file_name: "big.pdf".to_string(),
                    size_bytes: MAX_FILE_SIZE + 1,
                    data: Bytes::from_static(b"tiny stand-in"),
                },
            )
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::Invalid(ValidationError::FileTooLarge)]);

        // Extension matching ignores case.
        let replies = h
            .controller
            .handle(
                "u1",
                upload("Report.PDF", sample_pdf_bytes(&[(595.0, 842.0)])),
            )
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::MergeFileAdded { count: 1 }]);
        assert_eq!(workspace_file_count(&h), 1);
    }

    #[tokio::test]
    async fn processing_failure_leaves_session_intact() {
        let h = harness().await;
        h.controller
            .handle("u1", Event::SelectAction(Action::Merge))
            .await
            .unwrap();
        h.controller
            .handle("u1", upload("good.pdf", sample_pdf_bytes(&[(595.0, 842.0)])))
            .await
            .unwrap();
        h.controller
            .handle("u1", upload("bad.pdf", b"garbage bytes".to_vec()))
            .await
            .unwrap();

        let replies = h.controller.handle("u1", Event::Complete).await.unwrap();
        assert_eq!(replies, vec![Reply::ProcessingFailed]);

        // Session and its files survive, so cancel still cleans up.
        let session = h.store.get("u1").await.unwrap();
        assert_eq!(session.state, FlowState::MergeCollecting);
        assert_eq!(session.files.len(), 2);
        assert_eq!(workspace_file_count(&h), 2);

        let replies = h.controller.handle("u1", Event::Cancel).await.unwrap();
        assert_eq!(replies, vec![Reply::Menu]);
        assert_eq!(workspace_file_count(&h), 0);
    }

    #[tokio::test]
    async fn switching_operations_abandons_the_previous_one() {
        let h = harness().await;
        h.controller
            .handle("u1", Event::SelectAction(Action::Merge))
            .await
            .unwrap();
        h.controller
            .handle("u1", upload("a.pdf", sample_pdf_bytes(&[(595.0, 842.0)])))
            .await
            .unwrap();
        assert_eq!(workspace_file_count(&h), 1);

        h.controller
            .handle("u1", Event::SelectAction(Action::Rename))
            .await
            .unwrap();
        let session = h.store.get("u1").await.unwrap();
        assert_eq!(session.state, FlowState::RenameAwaitFile);
        assert!(session.files.is_empty());
        assert_eq!(workspace_file_count(&h), 0);
    }

    #[tokio::test]
    async fn out_of_place_events_prompt_a_restart() {
        let h = harness().await;

        // Text while idle.
        let replies = h
            .controller
            .handle("u1", Event::TextInput("hello".to_string()))
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::RestartPrompt]);

        // Complete during a rename.
        h.controller
            .handle("u1", Event::SelectAction(Action::Rename))
            .await
            .unwrap();
        let replies = h.controller.handle("u1", Event::Complete).await.unwrap();
        assert_eq!(replies, vec![Reply::RestartPrompt]);

        // Position choice before the watermark flow asks for one.
        let replies = h
            .controller
            .handle("u1", Event::SelectPosition(WatermarkPosition::Top))
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::RestartPrompt]);
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let h = harness().await;
        h.controller
            .handle("u1", Event::SelectAction(Action::Merge))
            .await
            .unwrap();
        h.controller
            .handle("u2", Event::SelectAction(Action::Watermark))
            .await
            .unwrap();
        h.controller
            .handle("u1", upload("a.pdf", sample_pdf_bytes(&[(595.0, 842.0)])))
            .await
            .unwrap();

        assert_eq!(
            h.store.get("u1").await.unwrap().state,
            FlowState::MergeCollecting
        );
        assert_eq!(
            h.store.get("u2").await.unwrap().state,
            FlowState::WatermarkAwaitFile
        );
        assert!(h.store.get("u2").await.unwrap().files.is_empty());
    }

    #[tokio::test]
    async fn help_does_not_disturb_state() {
        let h = harness().await;
        h.controller
            .handle("u1", Event::SelectAction(Action::Merge))
            .await
            .unwrap();
        let replies = h
            .controller
            .handle("u1", Event::SelectAction(Action::Help))
            .await
            .unwrap();
        assert_eq!(replies, vec![Reply::Help]);
        assert_eq!(
            h.store.get("u1").await.unwrap().state,
            FlowState::MergeCollecting
        );
    }

    #[test]
    fn pdf_suffix_stripping_is_case_insensitive() {
        assert_eq!(strip_pdf_suffix("report.pdf"), "report");
        assert_eq!(strip_pdf_suffix("report.PDF"), "report");
        assert_eq!(strip_pdf_suffix("report.Pdf"), "report");
        assert_eq!(strip_pdf_suffix("report"), "report");
        assert_eq!(strip_pdf_suffix("pdf"), "pdf");
        assert_eq!(strip_pdf_suffix("日本語.pdf"), "日本語");
        // Multibyte names without the suffix must pass through, even
        // when the would-be cut point falls inside a character.
        assert_eq!(strip_pdf_suffix("日本"), "日本");
        assert_eq!(strip_pdf_suffix("日本語"), "日本語");
        assert_eq!(strip_pdf_suffix("ß.p"), "ß.p");
    }
}
