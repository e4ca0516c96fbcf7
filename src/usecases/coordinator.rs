//! Generation request coordinator. Owns the session and the request lifecycle.
//!
//! - Validates input, raises a busy flag, calls the AI port, settles the result
//! - Every failure is recorded as a user-facing message in `AppState::error`
//! - Results are tagged with a generation counter; late writes to a replaced result are dropped
//! - Successful images are prepended to the history store
//!
//! The state lock is never held across an AI call, so busy flags are observable while it runs.

use crate::domain::{
    DomainError, GenerationResult, HistoryEntry, ImageOptions, Operation, Session,
};
use crate::ports::AiPort;
use crate::usecases::HistoryStore;
use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const EMPTY_IDEA: &str = "لازم تكتب فكرة البوست الأول.";
const EMPTY_IMAGE_PROMPT: &str = "اكتب وصف الصورة الأول.";
const NO_RESULT: &str = "لازم تعمل البوستات الأول.";
const EMPTY_INSTRUCTION: &str = "اكتب التعديل اللي عايزه الأول.";
const NO_SUCH_POST: &str = "البوست ده مش موجود.";

/// Session inputs, current result and request bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: Session,
    pub result: Option<GenerationResult>,
    /// Data URL of the image generated for the current result.
    pub image: Option<String>,
    pub generating_posts: bool,
    pub generating_image: bool,
    pub refining_index: Option<usize>,
    /// Last user-facing error. Cleared when a new request starts.
    pub error: Option<String>,
    /// Bumped by every post generation; identifies the current result.
    pub result_generation: u64,
}

#[derive(Debug, Clone, Copy)]
enum Busy {
    Posts,
    Image,
    Refine,
}

/// Clears a busy flag on every exit path. The flag is raised by the caller
/// together with the rest of the request-start transition.
struct BusyGuard<'a> {
    state: &'a Mutex<AppState>,
    kind: Busy,
}

impl<'a> BusyGuard<'a> {
    fn armed(state: &'a Mutex<AppState>, kind: Busy) -> Self {
        Self { state, kind }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        match self.kind {
            Busy::Posts => state.generating_posts = false,
            Busy::Image => state.generating_image = false,
            Busy::Refine => state.refining_index = None,
        }
    }
}

/// Coordinates post generation, image generation and refinement.
pub struct GenerationCoordinator {
    ai: Arc<dyn AiPort>,
    history: Arc<HistoryStore>,
    state: Mutex<AppState>,
}

impl GenerationCoordinator {
    pub fn new(ai: Arc<dyn AiPort>, history: Arc<HistoryStore>) -> Self {
        Self {
            ai,
            history,
            state: Mutex::new(AppState::default()),
        }
    }

    /// Clone of the whole application state.
    pub fn snapshot(&self) -> AppState {
        self.state.lock().clone()
    }

    pub fn session(&self) -> Session {
        self.state.lock().session.clone()
    }

    /// Edit the session inputs in place.
    pub fn update_session(&self, f: impl FnOnce(&mut Session)) {
        f(&mut self.state.lock().session);
    }

    pub fn dismiss_error(&self) {
        self.state.lock().error = None;
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.entries()
    }

    /// Wipe the history. The caller is responsible for user confirmation.
    pub async fn clear_history(&self) {
        self.history.clear().await;
    }

    /// Generate two posts and an image-prompt suggestion from the current session.
    ///
    /// Clears the previous result and image before calling the AI port.
    pub async fn generate_posts(&self) -> Result<GenerationResult, DomainError> {
        let (session, generation) = {
            let mut state = self.state.lock();
            if state.session.prompt.trim().is_empty() {
                let err = DomainError::Validation(EMPTY_IDEA.to_string());
                state.error = err.user_message(Operation::Posts);
                return Err(err);
            }
            state.generating_posts = true;
            state.error = None;
            state.result = None;
            state.image = None;
            state.result_generation += 1;
            (state.session.clone(), state.result_generation)
        };
        let _busy = BusyGuard::armed(&self.state, Busy::Posts);

        info!(
            goal = %session.goal,
            trained = session.is_trained(),
            niche = %session.niche.trim(),
            generation,
            "generating posts"
        );
        let outcome = self
            .ai
            .generate_posts(
                session.prompt.trim(),
                session.style_sample.trim(),
                session.goal,
                session.niche.trim(),
            )
            .await;
        self.settle_posts(generation, outcome)
    }

    fn settle_posts(
        &self,
        generation: u64,
        outcome: Result<GenerationResult, DomainError>,
    ) -> Result<GenerationResult, DomainError> {
        let mut state = self.state.lock();
        let current = state.result_generation == generation;
        match outcome {
            Ok(result) if current => {
                info!(generation, "posts generated");
                state.result = Some(result.clone());
                Ok(result)
            }
            Ok(_) => {
                warn!(generation, "newer post generation started, dropping result");
                Err(DomainError::Superseded)
            }
            Err(e) => {
                error!(error = %e, generation, "post generation failed");
                if current {
                    state.error = e.user_message(Operation::Posts);
                }
                Err(e)
            }
        }
    }

    /// Generate an image for the current result and record it in the history.
    ///
    /// Leaves the state untouched when `prompt` is blank or there is no result yet.
    /// The previous image is only replaced on success.
    /// Returns the image as a `data:image/jpeg;base64,` URL.
    pub async fn generate_image(
        &self,
        prompt: &str,
        options: &ImageOptions,
    ) -> Result<String, DomainError> {
        let (posts, generation) = {
            let mut state = self.state.lock();
            let posts = match state.result.as_ref() {
                Some(result) => result.posts.to_vec(),
                None => return Err(DomainError::Validation(NO_RESULT.to_string())),
            };
            if prompt.trim().is_empty() {
                return Err(DomainError::Validation(EMPTY_IMAGE_PROMPT.to_string()));
            }
            state.generating_image = true;
            state.error = None;
            (posts, state.result_generation)
        };
        let _busy = BusyGuard::armed(&self.state, Busy::Image);

        let request = options.to_request(prompt.trim());
        info!(
            model = %request.model,
            aspect_ratio = %request.aspect_ratio,
            style = %request.style,
            logo = request.logo.is_some(),
            "generating image"
        );
        let image_b64 = match self.ai.generate_image(&request).await {
            Ok(b64) => b64,
            Err(e) => {
                error!(error = %e, "image generation failed");
                self.state.lock().error = e.user_message(Operation::Image);
                return Err(e);
            }
        };

        let data_url = format!("data:image/jpeg;base64,{}", image_b64);
        {
            let mut state = self.state.lock();
            if state.result_generation == generation {
                state.image = Some(data_url.clone());
            } else {
                debug!(generation, "result replaced while image was generating");
            }
        }

        let now = Utc::now();
        self.history
            .append(HistoryEntry {
                id: now.to_rfc3339_opts(SecondsFormat::Nanos, true),
                timestamp: now.timestamp_millis(),
                posts,
                image_prompt: request.prompt,
                generated_image: data_url.clone(),
            })
            .await;
        info!(bytes_b64 = image_b64.len(), "image generated");
        Ok(data_url)
    }

    /// Rewrite the post at `index` following `instruction`.
    ///
    /// Only that post changes; the other post and the image prompt are kept.
    /// Leaves the state untouched when there is no such post or the instruction is blank.
    pub async fn refine_post(&self, index: usize, instruction: &str) -> Result<String, DomainError> {
        let (current, generation) = {
            let mut state = self.state.lock();
            let current = match state.result.as_ref().and_then(|r| r.posts.get(index)) {
                Some(post) => post.clone(),
                None => return Err(DomainError::Validation(NO_SUCH_POST.to_string())),
            };
            if instruction.trim().is_empty() {
                return Err(DomainError::Validation(EMPTY_INSTRUCTION.to_string()));
            }
            state.refining_index = Some(index);
            state.error = None;
            (current, state.result_generation)
        };
        let _busy = BusyGuard::armed(&self.state, Busy::Refine);

        info!(index, generation, "refining post");
        let outcome = self.ai.refine_post(&current, instruction.trim()).await;
        self.settle_refinement(index, generation, outcome)
    }

    fn settle_refinement(
        &self,
        index: usize,
        generation: u64,
        outcome: Result<String, DomainError>,
    ) -> Result<String, DomainError> {
        let mut state = self.state.lock();
        match outcome {
            Ok(text) => {
                let slot = if state.result_generation == generation {
                    state.result.as_mut().and_then(|r| r.posts.get_mut(index))
                } else {
                    None
                };
                match slot {
                    Some(post) => {
                        *post = text.clone();
                        info!(index, "post refined");
                        Ok(text)
                    }
                    None => {
                        warn!(index, generation, "result replaced during refinement, dropping");
                        Err(DomainError::Superseded)
                    }
                }
            }
            Err(e) => {
                error!(error = %e, index, "refinement failed");
                state.error = e.user_message(Operation::Refine);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAiAdapter;
    use crate::adapters::persistence::MemoryKvStore;
    use crate::domain::{Goal, ImageModel, ImageRequest, Logo, LogoPosition, REFINEMENT_ACTIONS};
    use crate::ports::KeyValuePort;
    use crate::usecases::history_store::HISTORY_KEY;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[derive(Default)]
    struct ScriptedAi {
        fail: AtomicBool,
        posts_calls: AtomicUsize,
        posts_gate: Option<Arc<Notify>>,
        image_gate: Option<Arc<Notify>>,
        refine_gate: Option<Arc<Notify>>,
        last_image: Mutex<Option<ImageRequest>>,
    }

    impl ScriptedAi {
        fn failing() -> Self {
            let ai = Self::default();
            ai.fail.store(true, Ordering::SeqCst);
            ai
        }

        fn check(&self) -> Result<(), DomainError> {
            if self.fail.load(Ordering::SeqCst) {
                Err(DomainError::Ai("503 Service Unavailable".into()))
            } else {
                Ok(())
            }
        }
    }

    async fn wait(gate: &Option<Arc<Notify>>) {
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    #[async_trait::async_trait]
    impl AiPort for ScriptedAi {
        async fn generate_posts(
            &self,
            idea: &str,
            _style_sample: &str,
            _goal: Goal,
            _niche: &str,
        ) -> Result<GenerationResult, DomainError> {
            let n = self.posts_calls.fetch_add(1, Ordering::SeqCst) + 1;
            wait(&self.posts_gate).await;
            self.check()?;
            Ok(GenerationResult {
                posts: [format!("{} A{}", idea, n), format!("{} B{}", idea, n)],
                image_prompt: format!("prompt {}", n),
            })
        }

        async fn generate_image(&self, request: &ImageRequest) -> Result<String, DomainError> {
            *self.last_image.lock() = Some(request.clone());
            wait(&self.image_gate).await;
            self.check()?;
            Ok("QUJD".into())
        }

        async fn refine_post(
            &self,
            current: &str,
            instruction: &str,
        ) -> Result<String, DomainError> {
            wait(&self.refine_gate).await;
            self.check()?;
            Ok(format!("{} ({})", current, instruction))
        }

        async fn generate_post_ideas(
            &self,
            topics: &[String],
        ) -> Result<Vec<String>, DomainError> {
            self.check()?;
            Ok(topics.to_vec())
        }
    }

    async fn coordinator_with(ai: Arc<dyn AiPort>) -> (Arc<GenerationCoordinator>, Arc<dyn KeyValuePort>) {
        let kv: Arc<dyn KeyValuePort> = Arc::new(MemoryKvStore::new());
        let history = Arc::new(HistoryStore::load(Arc::clone(&kv)).await);
        (Arc::new(GenerationCoordinator::new(ai, history)), kv)
    }

    async fn with_result(ai: Arc<ScriptedAi>) -> Arc<GenerationCoordinator> {
        let (coord, _) = coordinator_with(ai).await;
        coord.update_session(|s| s.prompt = "عرض خاص".into());
        coord.generate_posts().await.unwrap();
        coord
    }

    #[tokio::test]
    async fn test_blank_idea_is_validation_error() {
        let ai = Arc::new(ScriptedAi::default());
        let coord = with_result(Arc::clone(&ai)).await;
        let before = coord.snapshot().result;

        for blank in ["", "   ", "\n\t"] {
            coord.update_session(|s| s.prompt = blank.into());
            let err = coord.generate_posts().await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
            let state = coord.snapshot();
            assert_eq!(state.result, before);
            assert_eq!(state.error.as_deref(), Some(EMPTY_IDEA));
            assert!(!state.generating_posts);
        }
        assert_eq!(ai.posts_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_generate_posts_clears_previous_result_and_image_while_running() {
        let gate = Arc::new(Notify::new());
        let ai = Arc::new(ScriptedAi {
            posts_gate: Some(Arc::clone(&gate)),
            ..Default::default()
        });
        gate.notify_one();
        let coord = with_result(Arc::clone(&ai)).await;
        coord
            .generate_image("a storefront", &ImageOptions::default())
            .await
            .unwrap();
        assert!(coord.snapshot().image.is_some());

        let task = {
            let c = Arc::clone(&coord);
            tokio::spawn(async move { c.generate_posts().await })
        };
        tokio::task::yield_now().await;
        let mid = coord.snapshot();
        assert!(mid.generating_posts);
        assert!(mid.result.is_none());
        assert!(mid.image.is_none());

        gate.notify_one();
        let result = task.await.unwrap().unwrap();
        assert_eq!(result.posts.len(), 2);
        let done = coord.snapshot();
        assert!(!done.generating_posts);
        assert_eq!(done.result, Some(result));
        assert_eq!(coord.history().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_posts_failure_sets_message_and_clears_busy() {
        let (coord, _) = coordinator_with(Arc::new(ScriptedAi::failing())).await;
        coord.update_session(|s| s.prompt = "idea".into());
        let err = coord.generate_posts().await.unwrap_err();
        assert!(matches!(err, DomainError::Ai(_)));

        let state = coord.snapshot();
        assert!(state.result.is_none());
        assert!(!state.generating_posts);
        assert_eq!(
            state.error,
            DomainError::Ai(String::new()).user_message(Operation::Posts)
        );
    }

    #[tokio::test]
    async fn test_new_request_clears_previous_error() {
        let ai = Arc::new(ScriptedAi::default());
        let (coord, _) = coordinator_with(ai).await;
        assert!(coord.generate_posts().await.is_err());
        assert!(coord.snapshot().error.is_some());

        coord.update_session(|s| s.prompt = "idea".into());
        coord.generate_posts().await.unwrap();
        assert!(coord.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_image_prepends_history_with_current_posts() {
        let ai = Arc::new(ScriptedAi::default());
        let (coord, kv) = coordinator_with(Arc::clone(&ai) as Arc<dyn AiPort>).await;
        coord.update_session(|s| s.prompt = "first".into());
        coord.generate_posts().await.unwrap();
        coord.generate_image("one", &ImageOptions::default()).await.unwrap();

        coord.update_session(|s| s.prompt = "second".into());
        let second = coord.generate_posts().await.unwrap();
        let url = coord.generate_image("two", &ImageOptions::default()).await.unwrap();

        assert_eq!(url, "data:image/jpeg;base64,QUJD");
        let history = coord.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].posts, second.posts.to_vec());
        assert_eq!(history[0].image_prompt, "two");
        assert_eq!(history[0].generated_image, url);
        assert_eq!(history[1].image_prompt, "one");
        assert!(kv.get(HISTORY_KEY).await.unwrap().unwrap().contains("two"));
    }

    #[tokio::test]
    async fn test_image_history_uses_posts_at_call_time() {
        let gate = Arc::new(Notify::new());
        let ai = Arc::new(ScriptedAi {
            image_gate: Some(Arc::clone(&gate)),
            ..Default::default()
        });
        let coord = with_result(Arc::clone(&ai)).await;
        let original = coord.snapshot().result.unwrap();

        let task = {
            let c = Arc::clone(&coord);
            tokio::spawn(async move { c.generate_image("p", &ImageOptions::default()).await })
        };
        tokio::task::yield_now().await;
        assert!(coord.snapshot().generating_image);

        coord.refine_post(0, "shorter").await.unwrap();
        gate.notify_one();
        task.await.unwrap().unwrap();

        let entry = &coord.history()[0];
        assert_eq!(entry.posts, original.posts.to_vec());
        assert!(!coord.snapshot().generating_image);
    }

    #[tokio::test]
    async fn test_image_noop_without_result_or_prompt() {
        let ai = Arc::new(ScriptedAi::default());
        let (coord, _) = coordinator_with(Arc::clone(&ai) as Arc<dyn AiPort>).await;
        let err = coord
            .generate_image("p", &ImageOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        coord.update_session(|s| s.prompt = "idea".into());
        coord.generate_posts().await.unwrap();
        assert!(coord.generate_image("  ", &ImageOptions::default()).await.is_err());

        let state = coord.snapshot();
        assert!(state.error.is_none());
        assert!(!state.generating_image);
        assert!(coord.history().is_empty());
        assert!(ai.last_image.lock().is_none());
    }

    #[tokio::test]
    async fn test_image_failure_keeps_history_and_sets_message() {
        let ai = Arc::new(ScriptedAi::default());
        let coord = with_result(Arc::clone(&ai)).await;
        ai.fail.store(true, Ordering::SeqCst);

        assert!(coord.generate_image("p", &ImageOptions::default()).await.is_err());
        let state = coord.snapshot();
        assert!(coord.history().is_empty());
        assert!(!state.generating_image);
        assert_eq!(
            state.error,
            DomainError::Ai(String::new()).user_message(Operation::Image)
        );
        assert!(state.result.is_some());
    }

    #[tokio::test]
    async fn test_image_failure_keeps_previous_image() {
        let ai = Arc::new(ScriptedAi::default());
        let coord = with_result(Arc::clone(&ai)).await;
        let first = coord.generate_image("p", &ImageOptions::default()).await.unwrap();
        assert_eq!(coord.snapshot().image.as_deref(), Some(first.as_str()));

        ai.fail.store(true, Ordering::SeqCst);
        assert!(coord.generate_image("again", &ImageOptions::default()).await.is_err());
        let state = coord.snapshot();
        assert_eq!(state.image, Some(first));
        assert!(state.error.is_some());
        assert!(!state.generating_image);
    }

    #[tokio::test]
    async fn test_refinement_actions_send_their_instruction() {
        let ai = Arc::new(ScriptedAi::default());
        let coord = with_result(Arc::clone(&ai)).await;
        for action in REFINEMENT_ACTIONS {
            let text = coord.refine_post(0, action.instruction).await.unwrap();
            assert!(text.ends_with(&format!("({})", action.instruction)));
            assert_eq!(coord.snapshot().result.unwrap().posts[0], text);
        }
    }

    #[tokio::test]
    async fn test_image_request_is_normalized_with_logo() {
        let ai = Arc::new(ScriptedAi::default());
        let coord = with_result(Arc::clone(&ai)).await;
        let mut options = ImageOptions::default();
        options.attach_logo(Logo {
            bytes: vec![1, 2, 3],
            mime_type: "image/png".into(),
            position: LogoPosition::Corner,
        });

        coord.generate_image("p", &options).await.unwrap();
        let req = ai.last_image.lock().clone().unwrap();
        assert_eq!(req.model, ImageModel::FastEditing);
        assert_eq!(req.logo.unwrap().bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_refine_only_touches_target_post() {
        let ai = Arc::new(ScriptedAi::default());
        let coord = with_result(Arc::clone(&ai)).await;
        let before = coord.snapshot().result.unwrap();

        let text = coord.refine_post(1, "add emojis").await.unwrap();
        let after = coord.snapshot().result.unwrap();
        assert_eq!(after.posts[0], before.posts[0]);
        assert_eq!(after.image_prompt, before.image_prompt);
        assert_eq!(after.posts[1], text);
        assert_ne!(after.posts[1], before.posts[1]);
    }

    #[tokio::test]
    async fn test_refine_noop_for_bad_index_or_instruction() {
        let ai = Arc::new(ScriptedAi::default());
        let coord = with_result(Arc::clone(&ai)).await;
        let before = coord.snapshot();

        assert!(coord.refine_post(2, "shorter").await.is_err());
        assert!(coord.refine_post(0, "   ").await.is_err());
        let after = coord.snapshot();
        assert_eq!(after.result, before.result);
        assert!(after.error.is_none());
        assert!(after.refining_index.is_none());
    }

    #[tokio::test]
    async fn test_refining_index_visible_while_suspended() {
        let gate = Arc::new(Notify::new());
        let ai = Arc::new(ScriptedAi {
            refine_gate: Some(Arc::clone(&gate)),
            ..Default::default()
        });
        let coord = with_result(Arc::clone(&ai)).await;
        let task = {
            let c = Arc::clone(&coord);
            tokio::spawn(async move { c.refine_post(1, "formal").await })
        };
        tokio::task::yield_now().await;
        assert_eq!(coord.snapshot().refining_index, Some(1));

        gate.notify_one();
        task.await.unwrap().unwrap();
        assert_eq!(coord.snapshot().refining_index, None);
    }

    #[tokio::test]
    async fn test_refine_failure_sets_message() {
        let ai = Arc::new(ScriptedAi::default());
        let coord = with_result(Arc::clone(&ai)).await;
        let before = coord.snapshot().result;
        ai.fail.store(true, Ordering::SeqCst);

        assert!(coord.refine_post(0, "shorter").await.is_err());
        let state = coord.snapshot();
        assert_eq!(state.result, before);
        assert_eq!(
            state.error,
            DomainError::Ai(String::new()).user_message(Operation::Refine)
        );
        assert!(state.refining_index.is_none());
    }

    #[tokio::test]
    async fn test_stale_refinement_does_not_overwrite_new_result() {
        let gate = Arc::new(Notify::new());
        let ai = Arc::new(ScriptedAi {
            refine_gate: Some(Arc::clone(&gate)),
            ..Default::default()
        });
        let coord = with_result(Arc::clone(&ai)).await;

        let task = {
            let c = Arc::clone(&coord);
            tokio::spawn(async move { c.refine_post(0, "shorter").await })
        };
        tokio::task::yield_now().await;

        let fresh = coord.generate_posts().await.unwrap();
        gate.notify_one();
        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, DomainError::Superseded));

        let state = coord.snapshot();
        assert_eq!(state.result, Some(fresh));
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_persist_failure_does_not_fail_image() {
        struct BrokenKv;

        #[async_trait::async_trait]
        impl KeyValuePort for BrokenKv {
            async fn get(&self, _key: &str) -> Result<Option<String>, DomainError> {
                Ok(None)
            }

            async fn set(&self, _key: &str, _value: &str) -> Result<(), DomainError> {
                Err(DomainError::Persistence("read-only".into()))
            }
        }

        let history = Arc::new(HistoryStore::load(Arc::new(BrokenKv)).await);
        let coord = GenerationCoordinator::new(Arc::new(ScriptedAi::default()), history);
        coord.update_session(|s| s.prompt = "idea".into());
        coord.generate_posts().await.unwrap();

        assert!(coord.generate_image("p", &ImageOptions::default()).await.is_ok());
        assert_eq!(coord.history().len(), 1);
        assert!(coord.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_mock_adapter_scenario_sales_offer() {
        let (coord, _) = coordinator_with(Arc::new(MockAiAdapter::with_delay(0))).await;
        coord.update_session(|s| {
            s.prompt = "عرض خاص".into();
            s.goal = "بيعي".parse().unwrap();
        });
        let result = coord.generate_posts().await.unwrap();
        assert!(result.posts.iter().all(|p| !p.trim().is_empty()));
        assert!(!result.image_prompt.trim().is_empty());
    }

    #[tokio::test]
    async fn test_clear_history_empties_store() {
        let ai = Arc::new(ScriptedAi::default());
        let coord = with_result(Arc::clone(&ai)).await;
        coord.generate_image("p", &ImageOptions::default()).await.unwrap();
        coord.clear_history().await;
        assert!(coord.history().is_empty());
    }
}
