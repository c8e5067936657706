//! HTML board rendering via `minijinja`.
//!
//! The template is compiled into the binary and registered under a
//! `.html` name, so every value is HTML-escaped on output.

use minijinja::{Environment, context};

use crate::error::DisplayError;
use crate::state::StageView;

const BOARD_NAME: &str = "board.html";
const BOARD_TEMPLATE: &str = include_str!("../templates/board.html");

/// Seconds between reloads of the board page.
const REFRESH_SECONDS: u32 = 15;

/// Renders the stage board from stage views.
#[derive(Debug)]
pub struct Board {
    env: Environment<'static>,
}

impl Board {
    /// Create a board renderer with the built-in template loaded.
    pub fn new() -> Result<Self, DisplayError> {
        let mut env = Environment::new();
        env.add_template(BOARD_NAME, BOARD_TEMPLATE)
            .map_err(|e| DisplayError::Internal(format!("failed to add board template: {e}")))?;
        Ok(Self { env })
    }

    /// Render the board page for a competition.
    pub fn render(&self, title: &str, stages: &[StageView]) -> Result<String, DisplayError> {
        self.env
            .get_template(BOARD_NAME)
            .and_then(|template| {
                template.render(context! {
                    title => title,
                    stages => stages,
                    refresh_seconds => REFRESH_SECONDS,
                })
            })
            .map_err(|e| DisplayError::Internal(format!("board render failed: {e}")))
    }
}
