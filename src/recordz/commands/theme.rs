use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::settings::{Settings, Theme};
use crate::store::StorageBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    Show,
    Set(Theme),
    Toggle,
}

pub fn run<B: StorageBackend>(settings: &mut Settings<B>, action: ThemeAction) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let saved = match action {
        ThemeAction::Show => {
            let source = if settings.is_stored() { "saved" } else { "from system" };
            result.add_message(CmdMessage::info(format!(
                "theme = {} ({})",
                settings.theme(),
                source
            )));
            return Ok(result);
        }
        ThemeAction::Set(theme) => settings.set_theme(theme),
        ThemeAction::Toggle => settings.toggle_theme().map(|_| ()),
    };

    result.add_message(CmdMessage::success(format!("theme set to {}", settings.theme())));
    if let Err(e) = saved {
        result.add_message(CmdMessage::warning(format!(
            "Theme applied for this session only: {}",
            e
        )));
    }
    Ok(result)
}
