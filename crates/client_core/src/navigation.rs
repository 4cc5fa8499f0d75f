//! Role-gated navigation shell: menu selection, active item, logout.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    error::SessionError,
    role::{classify, Capability},
    session::{Session, SessionProvider},
};

pub const LOGIN_PATH: &str = "/login";
pub const DEFAULT_MOBILE_BREAKPOINT: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKey {
    Home,
    GraduationCap,
    Wallet,
    FolderOpen,
    User,
    LayoutDashboard,
    FileText,
    Trophy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub path: &'static str,
    pub label: &'static str,
    pub icon: IconKey,
}

const fn item(path: &'static str, label: &'static str, icon: IconKey) -> MenuItem {
    MenuItem { path, label, icon }
}

pub const ANONYMOUS_MENU: &[MenuItem] = &[
    item("/", "Bosh sahifa", IconKey::Home),
    item("/students", "O'quvchilar", IconKey::GraduationCap),
    item("/debtors", "Qarzdorlar", IconKey::Wallet),
    item("/projects", "Loyihalar", IconKey::FolderOpen),
    item(LOGIN_PATH, "Kirish", IconKey::User),
];

pub const STUDENT_MENU: &[MenuItem] = &[
    item("/", "Bosh sahifa", IconKey::Home),
    item("/tasks", "Qadamlar", IconKey::FileText),
    item("/students", "O'quvchilar", IconKey::GraduationCap),
    item("/debtors", "Qarzdorlar", IconKey::Wallet),
    item("/projects", "Loyihalar", IconKey::FolderOpen),
    item("/profile", "Profilim", IconKey::User),
];

pub const STAFF_MENU: &[MenuItem] = &[
    item("/dashboard", "Dashboard", IconKey::LayoutDashboard),
    item("/students", "O'quvchilar", IconKey::GraduationCap),
    item("/debtors", "Qarzdorlar", IconKey::Wallet),
    item("/student-steps", "Qadamlar nazorati", IconKey::Trophy),
    item("/projects", "Loyihalar", IconKey::FolderOpen),
    item("/tasks", "Vazifalar", IconKey::FileText),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuKind {
    Anonymous,
    Student,
    Staff,
}

impl MenuKind {
    pub fn items(self) -> &'static [MenuItem] {
        match self {
            Self::Anonymous => ANONYMOUS_MENU,
            Self::Student => STUDENT_MENU,
            Self::Staff => STAFF_MENU,
        }
    }
}

/// Signed-out visitors get the public menu; signed-in users get the student
/// menu only for the student capability and the staff menu otherwise.
pub fn select_menu(is_logged_in: bool, capability: Capability) -> MenuKind {
    match (is_logged_in, capability) {
        (false, _) => MenuKind::Anonymous,
        (true, Capability::Student) => MenuKind::Student,
        (true, _) => MenuKind::Staff,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub item: MenuItem,
    pub active: bool,
}

/// Marks the entry whose path equals `current_path` exactly; no prefix match.
pub fn menu_entries(menu: MenuKind, current_path: &str) -> Vec<NavEntry> {
    menu.items()
        .iter()
        .map(|item| NavEntry {
            item: *item,
            active: item.path == current_path,
        })
        .collect()
}

/// Routing collaborator.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate(&self, path: &str);
}

/// Navigator that only records the visited paths.
#[derive(Debug)]
pub struct HistoryNavigator {
    history: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            history: Mutex::new(vec![initial_path.into()]),
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Navigator for HistoryNavigator {
    fn current_path(&self) -> String {
        self.lock().last().cloned().unwrap_or_else(|| "/".to_string())
    }

    fn navigate(&self, path: &str) {
        self.lock().push(path.to_string());
    }
}

/// Application-wide signals consumed by the composition root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppSignal {
    /// Drop every controller and rebuild from scratch. Nothing held before
    /// the signal may survive it.
    Reinitialize,
}

pub struct NavigationGate {
    navigator: Arc<dyn Navigator>,
    session: Arc<dyn SessionProvider>,
    signals: broadcast::Sender<AppSignal>,
    mobile_breakpoint: u32,
}

impl NavigationGate {
    pub fn new(navigator: Arc<dyn Navigator>, session: Arc<dyn SessionProvider>) -> Self {
        let (signals, _) = broadcast::channel(16);
        Self {
            navigator,
            session,
            signals,
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
        }
    }

    pub fn with_mobile_breakpoint(mut self, breakpoint: u32) -> Self {
        self.mobile_breakpoint = breakpoint;
        self
    }

    pub fn mobile_breakpoint(&self) -> u32 {
        self.mobile_breakpoint
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppSignal> {
        self.signals.subscribe()
    }

    /// Re-read from the session store on every call.
    pub fn menu(&self) -> MenuKind {
        let session = Session::load(self.session.as_ref());
        select_menu(session.is_logged_in(), classify(&session))
    }

    pub fn entries(&self) -> Vec<NavEntry> {
        menu_entries(self.menu(), &self.navigator.current_path())
    }

    pub fn shows_logout(&self) -> bool {
        Session::load(self.session.as_ref()).is_logged_in()
    }

    /// Navigates to `item`; returns whether the mobile drawer should close.
    pub fn select(&self, item: &MenuItem, viewport_width: u32) -> bool {
        self.navigator.navigate(item.path);
        let close_drawer = viewport_width < self.mobile_breakpoint;
        debug!(path = item.path, close_drawer, "navigation item selected");
        close_drawer
    }

    /// Clears stored credentials, routes to the login page and requests a
    /// hard reset of all application state.
    ///
    /// The reset is signalled even if clearing the store fails; the store
    /// error is returned afterwards.
    pub fn logout(&self) -> Result<(), SessionError> {
        let cleared = Session::forget(self.session.as_ref());
        if let Err(err) = &cleared {
            warn!(error = %err, "failed to clear session during logout");
        }
        self.navigator.navigate(LOGIN_PATH);
        if self.signals.send(AppSignal::Reinitialize).is_err() {
            debug!("no subscriber for reinitialize signal");
        }
        info!("logged out");
        cleared
    }
}

#[cfg(test)]
#[path = "tests/navigation_tests.rs"]
mod tests;
