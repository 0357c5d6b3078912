//! Interactive session: settings, tool cache, interrupt flag and menu loop

pub mod interrupt;
pub mod log;
pub mod menu;
pub mod prompt;

use crate::backends::tools::ToolRegistry;
use crate::core::error::{MpsaError, Result};
use crate::core::render::Presenter;
use crate::core::settings::Settings;
use interrupt::Interrupt;

/// State shared by every menu action for the lifetime of the process
pub struct Session {
    pub settings: Settings,
    pub tools: ToolRegistry,
    pub interrupt: Interrupt,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self::with_tools(settings, ToolRegistry::new())
    }

    pub fn with_tools(settings: Settings, tools: ToolRegistry) -> Self {
        Self {
            settings,
            tools,
            interrupt: Interrupt::new(),
        }
    }

    pub fn presenter(&self) -> Presenter<'_> {
        Presenter::new(&self.tools, self.settings.pager_enabled)
    }

    /// `UserAbort` once Ctrl-C was pressed during the current action
    pub fn check_interrupt(&self) -> Result<()> {
        if self.interrupt.is_pending() {
            Err(MpsaError::UserAbort)
        } else {
            Ok(())
        }
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupt.is_pending()
    }
}
