//! Implements InputPort. Inquire-based interactive prompts.
//!
//! Main menu drives the coordinator: settings, post generation, refinement,
//! image generation with options, idea bank, style training and history.

use crate::adapters::ui::progress::with_spinner;
use crate::adapters::ui::render;
use crate::domain::{
    AspectRatio, DomainError, Goal, HistoryEntry, ImageModel, ImageOptions, ImageStyle, Logo,
    LogoPosition, Operation, REFINEMENT_ACTIONS,
};
use crate::ports::InputPort;
use crate::usecases::idea_bank::INTERESTS;
use crate::usecases::{GenerationCoordinator, IdeaBankService};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{Local, TimeZone};
use inquire::error::InquireError;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{Confirm, Select, Text};
use parking_lot::Mutex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

const POST_TITLES: [&str; 2] = ["الاقتراح الأول", "الاقتراح الثاني"];
const INTERRUPTED: &str = "interrupted";
const CUSTOM_REFINEMENT: &str = "✍️ اكتب التعديل بنفسك";

/// Applies the inquire theme used by every prompt.
pub fn apply_theme() {
    let mut config = RenderConfig::default();
    config.prompt_prefix = Styled::new("❯").with_fg(Color::LightMagenta);
    config.highlighted_option_prefix = Styled::new("➤").with_fg(Color::LightCyan);
    config.answered_prompt_prefix = Styled::new("✓").with_fg(Color::LightGreen);
    inquire::set_global_render_config(config);
}

/// Esc maps to `None` (go back). Ctrl+C unwinds to the main loop, which quits.
fn answer<T>(result: Result<T, InquireError>) -> Result<Option<T>, DomainError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(InquireError::OperationInterrupted) => Err(DomainError::Ui(INTERRUPTED.into())),
        Err(e) => Err(DomainError::Ui(e.to_string())),
    }
}

fn is_interrupt(err: &DomainError) -> bool {
    matches!(err, DomainError::Ui(msg) if msg == INTERRUPTED)
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Preset refinements followed by the free-text option.
fn refinement_choices() -> Vec<&'static str> {
    let mut choices: Vec<&'static str> = REFINEMENT_ACTIONS.iter().map(|a| a.label).collect();
    choices.push(CUSTOM_REFINEMENT);
    choices
}

/// First free path for an image saved at `stamp`; a numeric suffix avoids overwriting.
async fn next_image_path(dir: &Path, stamp: &str) -> PathBuf {
    let mut path = dir.join(format!("postx-{}.jpg", stamp));
    let mut n = 1;
    while tokio::fs::try_exists(&path).await.unwrap_or(false) {
        path = dir.join(format!("postx-{}-{}.jpg", stamp, n));
        n += 1;
    }
    path
}

/// One line per entry: local date and the start of the first post.
fn history_labels(entries: &[HistoryEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| {
            let when = Local
                .timestamp_millis_opt(e.timestamp)
                .single()
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| e.id.clone());
            let first = e.posts.first().map(|p| preview(p, 40)).unwrap_or_default();
            format!("{} │ {}", when, first)
        })
        .collect()
}

fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > max {
        format!("{}…", line.chars().take(max).collect::<String>())
    } else {
        line.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Generate,
    Settings,
    IdeaBank,
    Train,
    Refine,
    Image,
    History,
    Quit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuItem::Generate => "✨ اعملي بوست",
            MenuItem::Settings => "⚙️  إعدادات البوست (الفكرة، الهدف، المجال)",
            MenuItem::IdeaBank => "💡 بنك الأفكار",
            MenuItem::Train => "🧠 تدريب على أسلوبي",
            MenuItem::Refine => "✏️  عدّل بوست",
            MenuItem::Image => "🖼️  اعملي الصورة",
            MenuItem::History => "📜 بوستات سابقة",
            MenuItem::Quit => "خروج",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageMenuItem {
    Generate,
    Model,
    AspectRatio,
    Style,
    AttachLogo,
    RemoveLogo,
    Back,
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    coordinator: Arc<GenerationCoordinator>,
    ideas: Arc<IdeaBankService>,
    /// Kept across visits to the image menu.
    image_options: Mutex<ImageOptions>,
    images_dir: PathBuf,
}

impl TuiInputPort {
    pub fn new(
        coordinator: Arc<GenerationCoordinator>,
        ideas: Arc<IdeaBankService>,
        images_dir: PathBuf,
    ) -> Self {
        Self {
            coordinator,
            ideas,
            image_options: Mutex::new(ImageOptions::default()),
            images_dir,
        }
    }

    fn show_error(&self) {
        if let Some(msg) = self.coordinator.snapshot().error {
            render::print_error(&msg);
        }
    }

    fn show_result(&self) {
        if let Some(result) = self.coordinator.snapshot().result {
            for (title, post) in POST_TITLES.iter().zip(result.posts.iter()) {
                render::print_post(title, post);
            }
            render::print_info(&format!("\nاقتراح الصورة: {}", result.image_prompt));
        }
    }

    async fn edit_settings(&self) -> Result<(), DomainError> {
        let session = self.coordinator.session();
        let cursor = Goal::ALL.iter().position(|g| *g == session.goal).unwrap_or(0);
        let Some(goal) = answer(
            Select::new("1. حدد هدف البوست", Goal::ALL.to_vec())
                .with_starting_cursor(cursor)
                .prompt(),
        )?
        else {
            return Ok(());
        };
        let Some(niche) = answer(
            Text::new("2. اكتب مجال نشاطك (اختياري)")
                .with_initial_value(&session.niche)
                .with_placeholder("مثال: محل ملابس، مطعم، مدرب شخصي...")
                .prompt(),
        )?
        else {
            return Ok(());
        };
        let Some(prompt) = answer(
            Text::new("3. اكتب فكرة البوست")
                .with_initial_value(&session.prompt)
                .with_placeholder("اكتب هنا فكرة بسيطة عن البوست اللي عايزه...")
                .prompt(),
        )?
        else {
            return Ok(());
        };
        self.coordinator.update_session(|s| {
            s.goal = goal;
            s.niche = niche;
            s.prompt = prompt;
        });
        Ok(())
    }

    async fn generate_posts(&self) -> Result<(), DomainError> {
        if self.coordinator.session().prompt.trim().is_empty() {
            self.edit_settings().await?;
        }
        let outcome = with_spinner("بنجهزلك البوستات...", self.coordinator.generate_posts()).await;
        match outcome {
            Ok(_) => self.show_result(),
            Err(_) => self.show_error(),
        }
        Ok(())
    }

    async fn refine(&self) -> Result<(), DomainError> {
        let Some(post) = answer(Select::new("أنهي بوست؟", POST_TITLES.to_vec()).raw_prompt())?
        else {
            return Ok(());
        };
        let index = post.index;
        let Some(choice) = answer(Select::new("تعديل سريع", refinement_choices()).raw_prompt())?
        else {
            return Ok(());
        };
        let instruction = match REFINEMENT_ACTIONS.get(choice.index) {
            Some(action) => action.instruction.to_string(),
            None => {
                let Some(custom) = answer(
                    Text::new("عايز تعدل إيه؟")
                        .with_placeholder("مثال: زود إيموجي، خليه رسمي أكتر")
                        .prompt(),
                )?
                else {
                    return Ok(());
                };
                custom
            }
        };
        let outcome = with_spinner(
            "بنعدل البوست...",
            self.coordinator.refine_post(index, &instruction),
        )
        .await;
        match outcome {
            Ok(text) => render::print_post(POST_TITLES[index], &text),
            Err(DomainError::Validation(msg)) => render::print_error(&msg),
            Err(DomainError::Superseded) => {}
            Err(_) => self.show_error(),
        }
        Ok(())
    }

    fn image_menu_items(options: &ImageOptions) -> Vec<(ImageMenuItem, String)> {
        let lock = |locked: bool| if locked { " 🔒" } else { "" };
        let mut items = vec![
            (ImageMenuItem::Generate, "🎨 اعملي الصورة".to_string()),
            (
                ImageMenuItem::Model,
                format!("الموديل: {}{}", options.model(), lock(options.is_model_locked())),
            ),
            (
                ImageMenuItem::AspectRatio,
                format!(
                    "المقاس: {}{}",
                    options.aspect_ratio(),
                    lock(options.is_aspect_ratio_locked())
                ),
            ),
            (ImageMenuItem::Style, format!("الستايل: {}", options.style())),
        ];
        match options.logo() {
            Some(logo) => {
                items.push((
                    ImageMenuItem::AttachLogo,
                    format!("تغيير اللوجو (الحالي: {})", logo.position.as_str()),
                ));
                items.push((ImageMenuItem::RemoveLogo, "شيل اللوجو".to_string()));
            }
            None => items.push((ImageMenuItem::AttachLogo, "ضيف لوجو".to_string())),
        }
        items.push((ImageMenuItem::Back, "رجوع".to_string()));
        items
    }

    async fn image(&self) -> Result<(), DomainError> {
        let Some(result) = self.coordinator.snapshot().result else {
            return Ok(());
        };
        let Some(prompt) = answer(
            Text::new("اكتب اقتراحك للتصميم (بالإنجليزي):")
                .with_initial_value(&result.image_prompt)
                .prompt(),
        )?
        else {
            return Ok(());
        };

        loop {
            let options = self.image_options.lock().clone();
            let items = Self::image_menu_items(&options);
            let labels: Vec<String> = items.iter().map(|(_, l)| l.clone()).collect();
            let Some(picked) = answer(Select::new("إعدادات الصورة", labels).raw_prompt())?
            else {
                return Ok(());
            };
            let choice = items
                .get(picked.index)
                .map(|(item, _)| *item)
                .unwrap_or(ImageMenuItem::Back);

            match choice {
                ImageMenuItem::Generate => {
                    let outcome = with_spinner(
                        "الصورة بتتعمل...",
                        self.coordinator.generate_image(&prompt, &options),
                    )
                    .await;
                    match outcome {
                        Ok(data_url) => match self.save_image(&data_url).await {
                            Ok(path) => render::print_success(&format!(
                                "الصورة اتحفظت: {}",
                                path.display()
                            )),
                            Err(e) => {
                                warn!(error = %e, "failed to save image file");
                                render::print_error(&e.to_string());
                            }
                        },
                        Err(DomainError::Validation(msg)) => render::print_error(&msg),
                        Err(_) => self.show_error(),
                    }
                    return Ok(());
                }
                ImageMenuItem::Model => {
                    if options.is_model_locked() {
                        render::print_info("الموديل متثبت طول ما فيه لوجو.");
                        continue;
                    }
                    if let Some(model) =
                        answer(Select::new("الموديل", ImageModel::ALL.to_vec()).prompt())?
                    {
                        self.image_options.lock().set_model(model);
                    }
                }
                ImageMenuItem::AspectRatio => {
                    if options.is_aspect_ratio_locked() {
                        render::print_info("المقاس مربع بس مع الموديل السريع أو اللوجو.");
                        continue;
                    }
                    if let Some(ratio) =
                        answer(Select::new("المقاس", AspectRatio::ALL.to_vec()).prompt())?
                    {
                        self.image_options.lock().set_aspect_ratio(ratio);
                    }
                }
                ImageMenuItem::Style => {
                    if let Some(style) =
                        answer(Select::new("الستايل", ImageStyle::ALL.to_vec()).prompt())?
                    {
                        self.image_options.lock().set_style(style);
                    }
                }
                ImageMenuItem::AttachLogo => {
                    if let Some(logo) = self.ask_logo().await? {
                        self.image_options.lock().attach_logo(logo);
                    }
                }
                ImageMenuItem::RemoveLogo => {
                    self.image_options.lock().remove_logo();
                }
                ImageMenuItem::Back => return Ok(()),
            }
        }
    }

    async fn ask_logo(&self) -> Result<Option<Logo>, DomainError> {
        let Some(path) = answer(Text::new("مسار ملف اللوجو (png / jpg / webp):").prompt())? else {
            return Ok(None);
        };
        let path = PathBuf::from(path.trim());
        let Some(mime_type) = mime_for(&path) else {
            render::print_error("نوع الملف مش مدعوم.");
            return Ok(None);
        };
        let bytes = match tokio::fs::read(&path).await {
            Ok(b) => b,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read logo");
                render::print_error("معرفناش نقرا الملف.");
                return Ok(None);
            }
        };
        let positions = vec!["على المنتج", "في الركن"];
        let Some(position) = answer(Select::new("مكان اللوجو", positions).prompt())? else {
            return Ok(None);
        };
        let position = if position == "في الركن" {
            LogoPosition::Corner
        } else {
            LogoPosition::OnProduct
        };
        info!(path = %path.display(), bytes = bytes.len(), "logo attached");
        Ok(Some(Logo {
            bytes,
            mime_type: mime_type.to_string(),
            position,
        }))
    }

    /// Decode a `data:` URL and write it under the images directory.
    async fn save_image(&self, data_url: &str) -> Result<PathBuf, DomainError> {
        let b64 = data_url
            .split_once(',')
            .map(|(_, data)| data)
            .unwrap_or(data_url);
        let bytes = BASE64
            .decode(b64)
            .map_err(|e| DomainError::Persistence(format!("decode image: {}", e)))?;
        tokio::fs::create_dir_all(&self.images_dir)
            .await
            .map_err(|e| DomainError::Persistence(format!("create images dir: {}", e)))?;
        let stamp = Local::now().format("%Y%m%d-%H%M%S-%3f").to_string();
        let path = next_image_path(&self.images_dir, &stamp).await;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::Persistence(format!("write image: {}", e)))?;
        Ok(path)
    }

    async fn idea_bank(&self) -> Result<(), DomainError> {
        const CUSTOM: &str = "✍️ اكتب تخصصك بنفسك";
        let mut options: Vec<&str> = INTERESTS.to_vec();
        options.push(CUSTOM);
        let Some(picked) = answer(Select::new("اختار مجال اهتمامك", options).prompt())? else {
            return Ok(());
        };
        let (selected, custom) = if picked == CUSTOM {
            let Some(custom) = answer(
                Text::new("مجالك:")
                    .with_placeholder("مثال: تربية الحيوانات الأليفة")
                    .prompt(),
            )?
            else {
                return Ok(());
            };
            (None, custom)
        } else {
            (Some(picked), String::new())
        };

        let interest = match IdeaBankService::resolve_interest(selected, &custom) {
            Ok(i) => i,
            Err(e) => {
                if let Some(msg) = e.user_message(Operation::Ideas) {
                    render::print_error(&msg);
                }
                return Ok(());
            }
        };
        let ideas = match with_spinner("بنفكرلك في أفكار...", self.ideas.suggest(&interest)).await
        {
            Ok(ideas) if !ideas.is_empty() => ideas,
            Ok(_) => {
                render::print_info("مفيش أفكار المرة دي، جرب مجال تاني.");
                return Ok(());
            }
            Err(e) => {
                if let Some(msg) = e.user_message(Operation::Ideas) {
                    render::print_error(&msg);
                }
                return Ok(());
            }
        };
        if let Some(idea) = answer(Select::new("اختار فكرة", ideas).prompt())? {
            self.coordinator.update_session(|s| s.prompt = idea);
            render::print_success("الفكرة اتحطت في فكرة البوست.");
        }
        Ok(())
    }

    async fn train(&self) -> Result<(), DomainError> {
        let session = self.coordinator.session();
        if session.is_trained() {
            render::print_info(&format!(
                "تم التدريب ({} حرف). العينة الجديدة هتستبدل القديمة.",
                session.style_sample.chars().count()
            ));
        }
        render::print_info("الصق بوستات كتبتها قبل كده، وسطر فاضي في الآخر.");
        let mut lines = Vec::new();
        loop {
            let Some(line) = answer(Text::new("›").prompt())? else {
                return Ok(());
            };
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }
        let sample = lines.join("\n");
        let trained = !sample.trim().is_empty();
        self.coordinator.update_session(|s| s.style_sample = sample);
        if trained {
            render::print_success("تم التدريب على أسلوبك.");
        } else {
            render::print_info("اتمسح أسلوب الكتابة.");
        }
        Ok(())
    }

    async fn history(&self) -> Result<(), DomainError> {
        const CLEAR: &str = "🗑️ مسح الكل";
        let entries = self.coordinator.history();
        if entries.is_empty() {
            render::print_info("البوستات والصور اللي هتعملها هتتسجل هنا.");
            return Ok(());
        }
        let mut labels = history_labels(&entries);
        labels.push(CLEAR.to_string());

        // Labels can repeat; the option index identifies the entry.
        let Some(choice) = answer(Select::new("بوستات سابقة", labels).raw_prompt())? else {
            return Ok(());
        };
        let Some(entry) = entries.get(choice.index) else {
            let confirmed = answer(
                Confirm::new("متأكد إنك عايز تمسح كل البوستات السابقة؟")
                    .with_default(false)
                    .prompt(),
            )?
            .unwrap_or(false);
            if confirmed {
                self.coordinator.clear_history().await;
                render::print_success("اتمسح السجل.");
            }
            return Ok(());
        };
        for (i, post) in entry.posts.iter().enumerate() {
            let title = POST_TITLES.get(i).copied().unwrap_or("بوست");
            render::print_post(title, post);
        }
        render::print_info(&format!("\nاقتراح الصورة: {}", entry.image_prompt));
        let save = answer(Confirm::new("تحفظ الصورة في ملف؟").with_default(false).prompt())?
            .unwrap_or(false);
        if save {
            match self.save_image(&entry.generated_image).await {
                Ok(path) => render::print_success(&format!("الصورة اتحفظت: {}", path.display())),
                Err(e) => render::print_error(&e.to_string()),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let state = self.coordinator.snapshot();
            let mut items = vec![
                MenuItem::Generate,
                MenuItem::Settings,
                MenuItem::IdeaBank,
                MenuItem::Train,
            ];
            if state.result.is_some() {
                items.push(MenuItem::Refine);
                items.push(MenuItem::Image);
            }
            items.push(MenuItem::History);
            items.push(MenuItem::Quit);

            let trained = if state.session.is_trained() {
                " · تم التدريب"
            } else {
                ""
            };
            let header = format!(
                "PostX · {} · فكرة: {}{}",
                state.session.goal,
                preview(&state.session.prompt, 30),
                trained
            );
            let choice = match answer(Select::new(&header, items).prompt()) {
                Ok(Some(choice)) => choice,
                Ok(None) => continue,
                Err(e) if is_interrupt(&e) => break,
                Err(e) => return Err(e),
            };
            self.coordinator.dismiss_error();
            let outcome = match choice {
                MenuItem::Generate => self.generate_posts().await,
                MenuItem::Settings => self.edit_settings().await,
                MenuItem::IdeaBank => self.idea_bank().await,
                MenuItem::Train => self.train().await,
                MenuItem::Refine => self.refine().await,
                MenuItem::Image => self.image().await,
                MenuItem::History => self.history().await,
                MenuItem::Quit => break,
            };
            match outcome {
                Err(e) if is_interrupt(&e) => break,
                other => other?,
            }
        }
        info!("bye");
        Ok(())
    }
}
