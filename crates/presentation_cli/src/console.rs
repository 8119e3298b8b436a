//! Interactive console session
//!
//! Drives the main menu, runs the chosen adapter against operator input and
//! renders what comes back. A failed action is logged and the menu is shown
//! again; only exit or end of input leaves the loop.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use ai_core::{BedrockModelCatalog, Catalog, Invocation, InvocationError};
use domain::ModelSelection;
use futures::StreamExt;
use infrastructure::StdinInputSource;
use tracing::{error, info};

use crate::menu::{Menu, MenuAction};
use crate::render::{render_event, render_models, render_result};

/// Printed when the answer is not one of the menu numbers
pub const INVALID_CHOICE: &str =
    "Looks like you have not chosen available options. Please try again.";

pub struct Console<R, W, O> {
    catalog: Catalog,
    models: BedrockModelCatalog,
    input: StdinInputSource<R, W>,
    out: O,
    image_dir: PathBuf,
    menu: Menu,
}

impl<R, W, O> fmt::Debug for Console<R, W, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("image_dir", &self.image_dir)
            .field("menu", &self.menu)
            .finish_non_exhaustive()
    }
}

impl<R, W, O> Console<R, W, O>
where
    R: BufRead + Send,
    W: Write + Send,
    O: Write + Send,
{
    pub fn new(
        catalog: Catalog,
        models: BedrockModelCatalog,
        input: StdinInputSource<R, W>,
        out: O,
        image_dir: PathBuf,
    ) -> Self {
        let menu = Menu::from_entries(&catalog.entries());
        Self {
            catalog,
            models,
            input,
            out,
            image_dir,
            menu,
        }
    }

    pub const fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Run the menu loop until exit or end of input
    pub async fn run_menu(&mut self) -> anyhow::Result<()> {
        loop {
            self.menu.render(&mut self.out)?;
            let Some(answer) = self.input.read_line("Please select option: ")? else {
                writeln!(self.out)?;
                break;
            };

            let outcome = match self.menu.choose(&answer) {
                None => {
                    writeln!(self.out, "{INVALID_CHOICE}")?;
                    continue;
                },
                Some(MenuAction::Exit) => break,
                Some(MenuAction::ListModels) => self.list_models().await,
                Some(MenuAction::Invoke {
                    selection,
                    streaming,
                }) => self.invoke(selection, streaming).await,
            };
            report(&outcome);
        }

        info!("Thanks for using Amazon Bedrock!");
        Ok(())
    }

    /// Collect input for one selection, invoke it and render the answer
    pub async fn invoke(&mut self, selection: ModelSelection, streaming: bool) -> anyhow::Result<()> {
        let adapter = self.catalog.get_adapter(selection);
        info!(selection = %selection, streaming, "Invoking model");

        match adapter.process(&mut self.input, streaming).await? {
            Invocation::Complete(result) => {
                render_result(&mut self.out, &result, &self.image_dir)?;
            },
            Invocation::Streaming(mut events) => {
                while let Some(event) = events.next().await {
                    match event {
                        Ok(event) => render_event(&mut self.out, &event)?,
                        Err(e) => {
                            writeln!(self.out)?;
                            return Err(e.into());
                        },
                    }
                }
            },
        }

        Ok(())
    }

    /// Fetch and print the foundation models of the configured region
    pub async fn list_models(&mut self) -> anyhow::Result<()> {
        let models = self.models.list_foundation_models().await?;
        render_models(&mut self.out, &models)?;
        Ok(())
    }

    pub fn into_output(self) -> O {
        self.out
    }
}

fn report(outcome: &anyhow::Result<()>) {
    match outcome {
        Ok(()) => info!("Processing done"),
        Err(e) => match e.downcast_ref::<InvocationError>() {
            Some(invocation) => error!(kind = ?invocation.kind(), "{invocation}"),
            None => error!(error = %e, "Action failed"),
        },
    }
}
