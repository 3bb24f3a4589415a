//! The recolor-ink command.
//!
//! Sequencing only: locate the selected drawing, sample its first stroke's
//! color, ask the picker for a replacement, recolor, and persist if anything
//! changed. Each step runs once per invocation; nothing is retried.

use crate::color::InkColor;
use crate::error::{RecolorError, RecolorResult};
use crate::host::{BoxFuture, PageHost};
use crate::isf;
use crate::locator;
use crate::recolor::{self, RecolorOptions, RecolorReport, RecolorScope};
use crate::sampler;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Source of the replacement color (usually a dialog).
pub trait ColorPicker: Send + Sync {
    /// Offer `suggested` as the starting color. `None` means the user cancelled.
    fn pick(&self, suggested: InkColor) -> BoxFuture<'_, Option<InkColor>>;
}

/// How an invocation ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecolorOutcome {
    /// Drawings were rewritten and the page was saved.
    Recolored(RecolorReport),
    /// No stroke changed; the page was not saved.
    Unchanged,
    /// The user dismissed the picker.
    Cancelled,
    /// Another invocation of this command is still running.
    Busy,
}

/// Recolors every stroke sharing the selected drawing's color.
pub struct RecolorInkCommand<H: PageHost, P: ColorPicker> {
    host: Arc<H>,
    picker: P,
    options: RecolorOptions,
    active: AtomicBool,
}

/// Clears the single-flight flag when an invocation ends, however it ends.
struct ActiveGuard<'a>(&'a AtomicBool);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<H: PageHost, P: ColorPicker> RecolorInkCommand<H, P> {
    pub fn new(host: Arc<H>, picker: P) -> Self {
        Self::with_options(host, picker, RecolorOptions::default())
    }

    pub fn with_options(host: Arc<H>, picker: P, options: RecolorOptions) -> Self {
        Self {
            host,
            picker,
            options,
            active: AtomicBool::new(false),
        }
    }

    pub fn options(&self) -> RecolorOptions {
        self.options
    }

    /// Whether an invocation is in progress.
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Run the command once.
    pub async fn execute(&self) -> RecolorResult<RecolorOutcome> {
        if self
            .active
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            log::debug!("recolor ink already running");
            return Ok(RecolorOutcome::Busy);
        }
        let _guard = ActiveGuard(&self.active);

        let mut page = self.host.fetch_page().await.map_err(RecolorError::Fetch)?;

        let drawings = locator::locate(&page);
        let selected = match drawings.require_selected() {
            Ok(selected) => selected.clone(),
            Err(e) => {
                log::warn!("no ink drawing selected");
                return Err(e);
            }
        };

        let strokes = isf::decode(locator::payload(&page, &selected)).map_err(|source| {
            RecolorError::Codec {
                element: selected.path.clone(),
                source,
            }
        })?;
        let reference = match sampler::sample_color(&strokes) {
            Ok(color) => color,
            Err(e) => {
                log::warn!("no strokes found in selection");
                return Err(e);
            }
        };

        let Some(target) = self.picker.pick(reference).await else {
            log::info!("color selection cancelled");
            return Ok(RecolorOutcome::Cancelled);
        };

        let targets = match self.options.scope {
            RecolorScope::Document => drawings.all().to_vec(),
            RecolorScope::Selection => vec![selected],
        };
        let report = recolor::recolor(&mut page, &targets, reference, target, self.options.rewrite)?;

        if report.elements == 0 {
            log::info!("no strokes changed, page left as is");
            return Ok(RecolorOutcome::Unchanged);
        }

        log::info!(
            "recolored {} strokes in {} ink drawings from {} to {}",
            report.strokes,
            report.elements,
            reference,
            target
        );
        self.host.update_page(&page).await.map_err(RecolorError::Persist)?;
        Ok(RecolorOutcome::Recolored(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::page::Page;
    use crate::recolor::RewritePolicy;
    use crate::test_support::*;
    use pollster::block_on;
    use std::sync::Mutex;

    /// Picker returning a fixed answer and recording what it was offered.
    struct ScriptedPicker {
        answer: Option<InkColor>,
        offered: Mutex<Vec<InkColor>>,
    }

    impl ScriptedPicker {
        fn choosing(color: InkColor) -> Self {
            Self { answer: Some(color), offered: Mutex::new(Vec::new()) }
        }

        fn cancelling() -> Self {
            Self { answer: None, offered: Mutex::new(Vec::new()) }
        }

        fn offered(&self) -> Vec<InkColor> {
            self.offered.lock().unwrap().clone()
        }
    }

    impl ColorPicker for ScriptedPicker {
        fn pick(&self, suggested: InkColor) -> BoxFuture<'_, Option<InkColor>> {
            self.offered.lock().unwrap().push(suggested);
            let answer = self.answer;
            Box::pin(async move { answer })
        }
    }

    fn command(
        page: Page,
        picker: ScriptedPicker,
    ) -> (Arc<MemoryHost>, RecolorInkCommand<MemoryHost, ScriptedPicker>) {
        let host = Arc::new(MemoryHost::with_page(page));
        (host.clone(), RecolorInkCommand::new(host, picker))
    }

    #[test]
    fn test_recolors_whole_document() {
        let (host, command) = command(
            page(vec![
                drawing("all", &payload(&[RED, RED, RED])),
                drawing("none", &payload(&[RED, RED, BLUE])),
            ]),
            ScriptedPicker::choosing(GREEN),
        );

        let outcome = block_on(command.execute()).unwrap();

        assert_eq!(outcome, RecolorOutcome::Recolored(RecolorReport { elements: 2, strokes: 5 }));
        assert_eq!(host.update_count(), 1);
        assert_eq!(
            colors(&host.page().unwrap()),
            vec![vec![GREEN, GREEN, GREEN], vec![GREEN, GREEN, BLUE]]
        );
        assert_eq!(command.picker.offered(), vec![RED]);
        assert!(!command.is_running());
    }

    #[test]
    fn test_no_selection() {
        let original = page(vec![drawing("partial", &payload(&[RED]))]);
        let (host, command) = command(original.clone(), ScriptedPicker::choosing(GREEN));

        let err = block_on(command.execute()).unwrap_err();

        assert!(matches!(err, RecolorError::NoSelection));
        assert!(err.is_user_visible());
        assert_eq!(host.update_count(), 0);
        assert_eq!(host.page().unwrap(), original);
        assert!(command.picker.offered().is_empty());
    }

    #[test]
    fn test_empty_selection_has_no_strokes() {
        for data in ["", "   \n "] {
            let original = page(vec![drawing("all", data), drawing("none", &payload(&[RED]))]);
            let (host, command) = command(original.clone(), ScriptedPicker::choosing(GREEN));

            let err = block_on(command.execute()).unwrap_err();

            assert!(matches!(err, RecolorError::NoStrokesFound));
            assert!(err.is_user_visible());
            assert_eq!(host.update_count(), 0);
            assert_eq!(host.page().unwrap(), original);
        }
    }

    #[test]
    fn test_cancelled_picker() {
        let original = page(vec![drawing("all", &payload(&[RED]))]);
        let (host, command) = command(original.clone(), ScriptedPicker::cancelling());

        let outcome = block_on(command.execute()).unwrap();

        assert_eq!(outcome, RecolorOutcome::Cancelled);
        assert_eq!(host.update_count(), 0);
        assert_eq!(host.page().unwrap(), original);
    }

    #[test]
    fn test_corrupt_selection() {
        for data in ["%%% not base64 %%%", "AAEC"] {
            let original = page(vec![drawing("all", data), drawing("none", &payload(&[RED]))]);
            let (host, command) = command(original.clone(), ScriptedPicker::choosing(GREEN));

            let err = block_on(command.execute()).unwrap_err();

            assert!(matches!(err, RecolorError::Codec { .. }), "{data}: {err:?}");
            assert!(!err.is_user_visible());
            assert_eq!(host.update_count(), 0);
            assert_eq!(host.page().unwrap(), original);
            assert!(command.picker.offered().is_empty());
        }
    }

    #[test]
    fn test_corrupt_unselected_drawing_aborts_pass() {
        let original = page(vec![drawing("all", &payload(&[RED])), drawing("none", "AAEC")]);
        let (host, command) = command(original.clone(), ScriptedPicker::choosing(GREEN));

        let err = block_on(command.execute()).unwrap_err();

        assert!(matches!(err, RecolorError::Codec { .. }));
        assert_eq!(host.update_count(), 0);
        assert_eq!(host.page().unwrap(), original);
    }

    #[test]
    fn test_page_without_drawings() {
        let (host, command) = command(page(Vec::new()), ScriptedPicker::choosing(GREEN));

        let err = block_on(command.execute()).unwrap_err();

        assert!(matches!(err, RecolorError::NoSelection));
        assert_eq!(host.update_count(), 0);
    }

    #[test]
    fn test_same_color_is_not_persisted() {
        let (host, command) = command(
            page(vec![drawing("all", &payload(&[RED]))]),
            ScriptedPicker::choosing(RED),
        );

        let outcome = block_on(command.execute()).unwrap();

        assert_eq!(outcome, RecolorOutcome::Unchanged);
        assert_eq!(host.update_count(), 0);
    }

    #[test]
    fn test_same_color_persisted_when_counting_matches() {
        let host = Arc::new(MemoryHost::with_page(page(vec![drawing("all", &payload(&[RED]))])));
        let options = RecolorOptions { rewrite: RewritePolicy::Matched, ..Default::default() };
        let command = RecolorInkCommand::with_options(host.clone(), ScriptedPicker::choosing(RED), options);

        let outcome = block_on(command.execute()).unwrap();

        assert_eq!(outcome, RecolorOutcome::Recolored(RecolorReport { elements: 1, strokes: 1 }));
        assert_eq!(host.update_count(), 1);
    }

    #[test]
    fn test_selection_scope_limits_writes() {
        let other = payload(&[RED, BLUE]);
        let host = Arc::new(MemoryHost::with_page(page(vec![
            drawing("all", &payload(&[RED])),
            drawing("none", &other),
        ])));
        let options = RecolorOptions { scope: RecolorScope::Selection, ..Default::default() };
        let command = RecolorInkCommand::with_options(host.clone(), ScriptedPicker::choosing(GREEN), options);

        let outcome = block_on(command.execute()).unwrap();

        assert_eq!(outcome, RecolorOutcome::Recolored(RecolorReport { elements: 1, strokes: 1 }));
        let saved = host.page().unwrap();
        assert_eq!(colors(&saved)[0], vec![GREEN]);
        assert_eq!(payloads(&saved)[1], other);
    }

    #[test]
    fn test_persist_failure_propagates() {
        let (host, command) = command(
            page(vec![drawing("all", &payload(&[RED]))]),
            ScriptedPicker::choosing(GREEN),
        );
        host.set_fail_updates(true);

        let err = block_on(command.execute()).unwrap_err();

        assert!(matches!(err, RecolorError::Persist(_)));
        assert!(!command.is_running(), "guard released after failure");
    }

    #[test]
    fn test_fetch_failure_propagates() {
        let command = RecolorInkCommand::new(Arc::new(MemoryHost::new()), ScriptedPicker::choosing(GREEN));
        let err = block_on(command.execute()).unwrap_err();
        assert!(matches!(err, RecolorError::Fetch(_)));
    }

    #[test]
    fn test_reentrant_invocation_is_busy() {
        /// Picker that re-enters the command it belongs to.
        struct ReentrantPicker {
            command: Mutex<Option<Arc<RecolorInkCommand<MemoryHost, ReentrantPicker>>>>,
            nested: Mutex<Option<RecolorOutcome>>,
        }

        impl ColorPicker for ReentrantPicker {
            fn pick(&self, _suggested: InkColor) -> BoxFuture<'_, Option<InkColor>> {
                Box::pin(async move {
                    let command = self.command.lock().unwrap().clone();
                    if let Some(command) = command {
                        let outcome = command.execute().await.unwrap();
                        *self.nested.lock().unwrap() = Some(outcome);
                    }
                    None
                })
            }
        }

        let host = Arc::new(MemoryHost::with_page(page(vec![drawing("all", &payload(&[RED]))])));
        let picker = ReentrantPicker { command: Mutex::new(None), nested: Mutex::new(None) };
        let command = Arc::new(RecolorInkCommand::new(host, picker));
        *command.picker.command.lock().unwrap() = Some(command.clone());

        let outcome = block_on(command.execute()).unwrap();

        assert_eq!(outcome, RecolorOutcome::Cancelled);
        assert_eq!(*command.picker.nested.lock().unwrap(), Some(RecolorOutcome::Busy));
        assert!(!command.is_running());

        // Break the reference cycle.
        command.picker.command.lock().unwrap().take();
    }

    #[test]
    fn test_independent_commands_do_not_share_guard() {
        let first = command(page(vec![drawing("all", &payload(&[RED]))]), ScriptedPicker::choosing(GREEN)).1;
        let second = command(page(vec![drawing("all", &payload(&[RED]))]), ScriptedPicker::choosing(GREEN)).1;

        first.active.store(true, Ordering::SeqCst);
        let outcome = block_on(second.execute()).unwrap();

        assert!(matches!(outcome, RecolorOutcome::Recolored(_)));
        assert_eq!(block_on(first.execute()).unwrap(), RecolorOutcome::Busy);
    }
}
