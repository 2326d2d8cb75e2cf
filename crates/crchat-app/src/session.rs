use anyhow::Result;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crchat_api::OllamaClient;
use crchat_session::{ChatController, ConfigDraft, SessionError};
use crchat_types::EndpointConfig;

use crate::cli::{Cli, ConfigOverrides};
use crate::paths::{config_dir, settings_path};
use crate::store::{DirectorySink, FileStore};
use crate::view::TerminalView;

/// Fields to change in the saved config; `None` keeps the saved value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub base_url: Option<String>,
    pub model_name: Option<String>,
    pub system_prompt: Option<String>,
}

/// Controller wired to the terminal collaborators
pub struct Session {
    pub controller: ChatController,
    pub view: Rc<TerminalView>,
    pub settings_path: PathBuf,
    /// Config as loaded from disk, before this run's overrides
    stored: RefCell<EndpointConfig>,
    overrides: ConfigOverrides,
}

impl Session {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let dir = config_dir(cli.config_dir.as_deref())?;
        let settings_path = settings_path(&dir);
        log::debug!("Settings file: {}", settings_path.display());

        let view = Rc::new(TerminalView::new(cli.yes));
        let controller = ChatController::new(
            Rc::new(OllamaClient::new()),
            Rc::new(FileStore::new(&settings_path)),
            view.clone(),
            Rc::new(DirectorySink::new(&cli.export_dir)),
        )
        .with_sampling(cli.sampling());

        let stored = controller.config();
        let overrides = cli.overrides();
        controller.use_config(overrides.apply(stored.clone()));

        Ok(Self {
            controller,
            view,
            settings_path,
            stored: RefCell::new(stored),
            overrides,
        })
    }

    pub fn stored_config(&self) -> EndpointConfig {
        self.stored.borrow().clone()
    }

    /// Save `update` on top of the stored config.
    ///
    /// Overrides never reach the file. Afterwards the live config is the
    /// saved one with this run's overrides reapplied to the fields the
    /// update left alone.
    pub fn update_config(&self, update: &ConfigUpdate) -> Result<(), SessionError> {
        let mut draft = ConfigDraft::from(&*self.stored.borrow());
        if let Some(url) = &update.base_url {
            draft.base_url = url.clone();
        }
        if let Some(model) = &update.model_name {
            draft.model_name = model.clone();
        }
        if let Some(prompt) = &update.system_prompt {
            draft.system_prompt = prompt.clone();
        }

        let result = self.controller.on_save_config(&draft);
        if matches!(&result, Err(e) if e.is_validation()) {
            return result;
        }

        // The controller applied the draft even if writing it failed
        let saved = self.controller.config();
        let overrides = ConfigOverrides {
            base_url: self.overrides.base_url.clone().filter(|_| update.base_url.is_none()),
            model_name: self.overrides.model_name.clone().filter(|_| update.model_name.is_none()),
            system_prompt: self.overrides.system_prompt.clone().filter(|_| update.system_prompt.is_none()),
        };
        self.controller.use_config(overrides.apply(saved.clone()));
        *self.stored.borrow_mut() = saved;
        result
    }
}
