//! Explorer state and main event loop.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::event::{Event, EventHandler};
use super::ui;
use crate::executor::{BatchHandle, ExecutionEngine};
use crate::models::{BatchSummary, Status, TestCase};
use crate::navigation::{NavError, NavigationState, Selection};
use crate::render::{format_parameter, render_tree, RenderError, RenderedTree};
use crate::tree::{Explorer, TreeNode, ViewKind};

const H_SCROLL_STEP: u16 = 4;
const DETAIL_SCROLL_STEP: u16 = 5;

/// Pass counts over every discovered case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub passed: usize,
    pub running: usize,
    pub total: usize,
    pub duration_ms: u64,
}

/// Main application state.
pub struct App {
    explorer: Explorer,
    pub nav: NavigationState,
    engine: ExecutionEngine,
    /// Batches started from the explorer that have not settled yet
    batches: Vec<BatchHandle>,
    /// Message of the last action or settled batch
    pub status_message: Option<String>,
    pub last_summary: Option<BatchSummary>,
    /// Horizontal scroll of the tree pane
    pub h_scroll: u16,
    /// Vertical scroll of the detail pane
    pub detail_scroll: u16,
    pub should_quit: bool,
}

impl App {
    /// Fails when the explorer holds no cases, since there is nothing to select.
    pub fn new(
        explorer: Explorer,
        engine: ExecutionEngine,
        view: ViewKind,
        expand_all: bool,
    ) -> anyhow::Result<Self> {
        if explorer.cases().is_empty() {
            anyhow::bail!("No tests are registered");
        }

        let mut nav = NavigationState::new(view, expand_all);
        nav.clamp(explorer.root(view));

        Ok(Self {
            explorer,
            nav,
            engine,
            batches: Vec::new(),
            status_message: None,
            last_summary: None,
            h_scroll: 0,
            detail_scroll: 0,
            should_quit: false,
        })
    }

    /// Root of the active view
    pub fn root(&self) -> &TreeNode {
        self.explorer.root(self.nav.view())
    }

    pub fn cases(&self) -> &[Arc<TestCase>] {
        self.explorer.cases()
    }

    pub fn running_batches(&self) -> usize {
        self.batches.len()
    }

    pub fn rendered(&self) -> Result<RenderedTree, RenderError> {
        render_tree(self.root(), self.nav.path(), self.nav.expansion())
    }

    pub fn progress(&self) -> Progress {
        let mut progress = Progress {
            total: self.cases().len(),
            ..Default::default()
        };
        for case in self.cases() {
            let (status, result) = case.snapshot();
            match status {
                Status::Succeeded => progress.passed += 1,
                Status::Running => progress.running += 1,
                _ => {}
            }
            if let Some(result) = result {
                progress.duration_ms += result.duration_ms();
            }
        }
        progress
    }

    /// Apply one key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<(), NavError> {
        let view = self.nav.view();
        let root = self.explorer.root(view);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Tab => {
                let other = self.explorer.root(view.toggled());
                self.nav.switch_view(other);
                self.h_scroll = 0;
                self.detail_scroll = 0;
            }
            KeyCode::Left if ctrl => self.h_scroll = self.h_scroll.saturating_sub(H_SCROLL_STEP),
            KeyCode::Right if ctrl => self.h_scroll = self.h_scroll.saturating_add(H_SCROLL_STEP),
            KeyCode::Left => {
                self.nav.collapse(root)?;
                self.detail_scroll = 0;
            }
            KeyCode::Right => {
                self.nav.expand(root)?;
                self.detail_scroll = 0;
            }
            KeyCode::Up => {
                self.nav.move_sibling(root, -1)?;
                self.detail_scroll = 0;
            }
            KeyCode::Down => {
                self.nav.move_sibling(root, 1)?;
                self.detail_scroll = 0;
            }
            KeyCode::Char(' ') => {
                self.nav.toggle_expanded(root)?;
            }
            KeyCode::PageUp => {
                self.detail_scroll = self.detail_scroll.saturating_sub(DETAIL_SCROLL_STEP)
            }
            KeyCode::PageDown => {
                self.detail_scroll = self.detail_scroll.saturating_add(DETAIL_SCROLL_STEP)
            }
            KeyCode::Enter => self.run_selection()?,
            KeyCode::Char('a') => self.run_all(),
            _ => {}
        }

        Ok(())
    }

    /// Start the selected case, or every case below the selected node
    pub fn run_selection(&mut self) -> Result<(), NavError> {
        let cases = self.nav.resolve(self.root())?.cases();
        self.start(cases);
        Ok(())
    }

    pub fn run_all(&mut self) {
        let cases = self.cases().to_vec();
        self.start(cases);
    }

    fn start(&mut self, cases: Vec<Arc<TestCase>>) {
        let requested = cases.len();
        let handle = self.engine.start(cases);

        let message = match handle.rejected() {
            0 => format!("Started {} cases", handle.cases().len()),
            rejected => format!(
                "Started {} cases ({} of {} already running)",
                handle.cases().len(),
                rejected,
                requested
            ),
        };
        debug!("{}", message);
        self.status_message = Some(message);
        self.batches.push(handle);
    }

    /// Collect the summaries of batches that have settled
    pub fn on_tick(&mut self) {
        for handle in std::mem::take(&mut self.batches) {
            match handle.finish() {
                Ok(summary) => {
                    self.status_message = Some(summary.to_string());
                    self.last_summary = Some(summary);
                }
                Err(pending) => self.batches.push(pending),
            }
        }
    }

    /// Lines of the detail pane for the current selection
    pub fn detail_lines(&self) -> Result<Vec<String>, NavError> {
        let lines = match self.nav.resolve(self.root())? {
            Selection::Case(case) => case_details(case),
            Selection::Node(node) => node_details(node),
        };
        Ok(lines)
    }

    /// Run the main loop until the user quits.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        tick_rate: Duration,
    ) -> anyhow::Result<()> {
        let mut events = EventHandler::new(tick_rate);

        loop {
            let tree = self.rendered()?;
            let detail = self.detail_lines()?;
            terminal.draw(|frame| ui::render(self, &tree, &detail, frame))?;

            match events.next().await {
                Some(Event::Key(key)) => self.handle_key(key)?,
                Some(Event::Tick) => self.on_tick(),
                None => break,
            }

            if self.should_quit {
                break;
            }
        }

        if !self.batches.is_empty() {
            info!("Leaving {} running batches detached", self.batches.len());
        }
        Ok(())
    }
}

fn case_details(case: &TestCase) -> Vec<String> {
    let (status, result) = case.snapshot();
    let mut lines = vec![
        format!("Test:     {}", case.test_name),
        format!("Case:     {}", case.label()),
        format!("Identity: {}", case.identity),
        format!("Category: {}", case.category_path),
        format!("Status:   {} {}", status.symbol(), status),
    ];

    if let Some(result) = &result {
        lines.push(format!("Duration: {}ms", result.duration_ms()));
    }

    if !case.parameters.is_empty() {
        lines.push(String::new());
        lines.push("Parameters:".to_string());
        lines.extend(
            case.parameters
                .iter()
                .map(|p| format!("  {}", format_parameter(p))),
        );
    }

    if let Some(message) = result.and_then(|r| r.fail_message) {
        lines.push(String::new());
        lines.extend(message.lines().map(str::to_string));
    }

    lines
}

fn node_details(node: &TreeNode) -> Vec<String> {
    let mut lines = vec![
        node.name.clone(),
        format!("{} cases", node.cases().len()),
        String::new(),
    ];
    lines.extend(
        node.status_counts()
            .into_iter()
            .map(|(status, count)| format!("{status:<8} {count}")),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert;
    use crate::executor::RegistryInvoker;
    use crate::registry::{Registry, TestDef};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let mut registry = Registry::new();
        registry
            .suite("net::http", "ClientTests")
            .category("Net/HTTP")
            .add(TestDef::sync("Check", |_| Ok(())))
            .unwrap()
            .add(TestDef::sync("Parse", |_| Ok(assert::same(1, 2, "")?)))
            .unwrap();
        registry
            .suite("net::http", "ServerTests")
            .category("Net/HTTP")
            .add(TestDef::sync("Check", |_| Ok(())))
            .unwrap();

        let engine = ExecutionEngine::new(RegistryInvoker::from_registry(&registry));
        App::new(
            Explorer::from_registry(&registry),
            engine,
            ViewKind::Code,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_explorer_is_rejected() {
        let registry = Registry::new();
        let engine = ExecutionEngine::new(RegistryInvoker::from_registry(&registry));
        let result = App::new(
            Explorer::from_registry(&registry),
            engine,
            ViewKind::Category,
            true,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = app();
        // Code View: net > http > { ClientTests, ServerTests }
        app.handle_key(key(KeyCode::Right)).unwrap();
        app.handle_key(key(KeyCode::Right)).unwrap();
        app.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(app.nav.path(), &[0, 0, 1]);
        assert_eq!(app.rendered().unwrap().selected_label, "ServerTests");

        app.handle_key(key(KeyCode::Left)).unwrap();
        assert_eq!(app.nav.path(), &[0, 0]);

        app.handle_key(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.nav.view(), ViewKind::Category);
        assert_eq!(app.nav.path(), &[0]);

        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_scroll_keys() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(app.h_scroll, H_SCROLL_STEP);
        assert_eq!(app.nav.path(), &[0]);

        app.handle_key(key(KeyCode::PageDown)).unwrap();
        app.handle_key(key(KeyCode::PageUp)).unwrap();
        app.handle_key(key(KeyCode::PageUp)).unwrap();
        assert_eq!(app.detail_scroll, 0);
    }

    #[test]
    fn test_node_details() {
        let app = app();
        let lines = app.detail_lines().unwrap();
        assert_eq!(lines[0], "net");
        assert_eq!(lines[1], "3 cases");
        assert!(lines.iter().any(|l| l.starts_with("NOT RUN") && l.ends_with('3')));
    }

    #[tokio::test]
    async fn test_run_all_and_collect() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.running_batches(), 1);
        assert_eq!(app.status_message.as_deref(), Some("Started 3 cases"));

        for _ in 0..100 {
            app.on_tick();
            if app.running_batches() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(app.running_batches(), 0);

        let summary = app.last_summary.as_ref().unwrap();
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);

        let progress = app.progress();
        assert_eq!(progress.passed, 2);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.running, 0);
    }

    #[tokio::test]
    async fn test_run_selected_case_shows_failure() {
        let mut app = app();
        // net > http > ClientTests > Parse
        for code in [KeyCode::Right, KeyCode::Right, KeyCode::Right, KeyCode::Down] {
            app.handle_key(key(code)).unwrap();
        }
        assert!(app.nav.selecting_leaf());
        app.handle_key(key(KeyCode::Enter)).unwrap();

        for _ in 0..100 {
            app.on_tick();
            if app.running_batches() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let lines = app.detail_lines().unwrap();
        assert!(lines.iter().any(|l| l.contains("FAIL")));
        assert!(lines.iter().any(|l| l == "Assertion failed:"));
        assert_eq!(app.progress().passed, 0);
    }
}
