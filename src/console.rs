//! Line-oriented labeling console driving a [`LabelerSelector`].

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use thiserror::Error;

use crate::api::Uploader;
use crate::crops::CropResolver;
use crate::labeling::{LabelerError, LabelerSelector, SubmitError, submit_page, summary};
use crate::predictables::{LabelId, ModelType, Orientation, PredictableError};

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("{0}")]
    Parse(String),
    #[error(transparent)]
    Predictable(#[from] PredictableError),
    #[error(transparent)]
    Labeler(#[from] LabelerError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error("Cell {cell} out of range (page has {len} cells)")]
    CellOutOfRange { cell: usize, len: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// One console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Next,
    Prev,
    Set { cell: usize, id: LabelId },
    Submit,
    Kind(ModelType),
    Side(Orientation),
    Options(usize),
    Info,
    Crops,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = ConsoleError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Err(ConsoleError::Parse("Empty command".into()));
        };
        let mut arg = |what: &str| {
            parts
                .next()
                .ok_or_else(|| ConsoleError::Parse(format!("{name} requires {what}")))
        };
        let command = match name {
            "show" | "s" => Self::Show,
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Prev,
            "set" => {
                let cell = parse_number(arg("a cell index")?)?;
                let id = parse_number(arg("a label id")?)?;
                Self::Set { cell, id }
            }
            "submit" => Self::Submit,
            "kind" => Self::Kind(arg("a kind")?.parse()?),
            "side" => Self::Side(arg("surv or killer")?.parse()?),
            "options" | "o" => Self::Options(parse_number(arg("a cell index")?)?),
            "info" => Self::Info,
            "crops" => Self::Crops,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => return Err(ConsoleError::Parse(format!("Unknown command: {other}"))),
        };
        Ok(command)
    }
}

fn parse_number<T: FromStr>(value: &str) -> Result<T, ConsoleError> {
    value
        .parse()
        .map_err(|_| ConsoleError::Parse(format!("Not a number: {value}")))
}

/// Whether the loop keeps reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Console state: the sessions, where corrections go and the draft of the page in view.
pub struct Console<'a> {
    selector: LabelerSelector,
    uploader: &'a dyn Uploader,
    crops: CropResolver,
    draft: Vec<LabelId>,
}

impl<'a> Console<'a> {
    pub fn new(selector: LabelerSelector, uploader: &'a dyn Uploader, crops: CropResolver) -> Self {
        let mut console = Self {
            selector,
            uploader,
            crops,
            draft: Vec::new(),
        };
        console.reset_draft();
        console
    }

    pub fn selector(&self) -> &LabelerSelector {
        &self.selector
    }

    /// Labels the next `submit` would upload.
    pub fn draft(&self) -> &[LabelId] {
        &self.draft
    }

    fn reset_draft(&mut self) {
        self.draft = self
            .selector
            .labeler()
            .map(|labeler| labeler.labels())
            .unwrap_or_default();
    }

    /// Read commands until `quit` or end of input. Command errors are printed, not returned.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
        let shown = self.execute(Command::Show, out);
        report(shown, out)?;
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let outcome = line
                .parse::<Command>()
                .and_then(|command| self.execute(command, out));
            if report(outcome, out)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Flow, ConsoleError> {
        match command {
            Command::Show => self.render_page(out)?,
            Command::Next => {
                self.selector.next()?;
                self.reset_draft();
                self.render_page(out)?;
            }
            Command::Prev => {
                self.selector.previous()?;
                self.reset_draft();
                self.render_page(out)?;
            }
            Command::Set { cell, id } => {
                let len = self.draft.len();
                let slot = self
                    .draft
                    .get_mut(cell)
                    .ok_or(ConsoleError::CellOutOfRange { cell, len })?;
                *slot = id;
                writeln!(out, "cell {cell} = {}", self.label_name(id))?;
            }
            Command::Submit => {
                submit_page(&mut self.selector, self.uploader, &self.draft)?;
                self.reset_draft();
                writeln!(out, "submitted")?;
                self.render_page(out)?;
            }
            Command::Kind(model_type) => {
                self.selector.set_model_type(model_type)?;
                self.reset_draft();
                self.render_page(out)?;
            }
            Command::Side(orientation) => {
                self.selector.set_orientation(orientation)?;
                self.reset_draft();
                self.render_page(out)?;
            }
            Command::Options(cell) => self.render_options(cell, out)?,
            Command::Info => {
                write!(out, "{}", summary::render_markdown(&self.selector.get_tc_info()))?;
            }
            Command::Crops => {
                let labeler = self.selector.labeler()?;
                for path in labeler.crop_paths(&self.crops) {
                    writeln!(out, "{}", path.display())?;
                }
            }
            Command::Help => writeln!(out, "{}", help_text())?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn label_name(&self, id: LabelId) -> String {
        self.selector
            .catalogs()
            .entry(self.selector.fmt(), id)
            .map(|entry| format!("{id} {}", entry.name))
            .unwrap_or_else(|| id.to_string())
    }

    fn render_page(&mut self, out: &mut impl Write) -> Result<(), ConsoleError> {
        let reloaded = self.selector.take_options_if_changed().map(<[_]>::len);
        let labeler = self.selector.labeler()?;
        let counts = labeler.counts();
        writeln!(
            out,
            "[{}] completed {}/{} pending {}",
            labeler.fmt(),
            counts.completed,
            counts.total,
            counts.pending
        )?;
        if labeler.done() {
            writeln!(out, "nothing left to label")?;
            return Ok(());
        }
        if let Some(cells) = reloaded {
            writeln!(out, "choices updated for {cells} cells (options <cell>)")?;
        }
        for (ix, cell) in labeler.current().cells().iter().enumerate() {
            let Some(match_id) = cell.match_id else {
                continue;
            };
            let label = self.draft.get(ix).copied().unwrap_or(cell.label_id);
            writeln!(
                out,
                "{ix:>2}  match {match_id} ({}) player {} item {}  {}",
                cell.filename,
                cell.player_id.map(|p| p.to_string()).unwrap_or_default(),
                cell.item_index,
                self.label_name(label),
            )?;
        }
        Ok(())
    }

    fn render_options(&self, cell: usize, out: &mut impl Write) -> Result<(), ConsoleError> {
        let options = self.selector.options();
        let list = options.get(cell).ok_or(ConsoleError::CellOutOfRange {
            cell,
            len: options.len(),
        })?;
        for option in list {
            writeln!(out, "{:>6}  {}", option.id, option.label)?;
        }
        Ok(())
    }
}

fn report(outcome: Result<Flow, ConsoleError>, out: &mut impl Write) -> io::Result<Flow> {
    match outcome {
        Ok(flow) => Ok(flow),
        Err(ConsoleError::Io(err)) => Err(err),
        Err(err) => {
            tracing::debug!(error = %err, "command failed");
            writeln!(out, "error: {err}")?;
            Ok(Flow::Continue)
        }
    }
}

pub fn help_text() -> String {
    [
        "Commands:",
        "  show                 Print the page in view.",
        "  next | prev          Move one page forward or back.",
        "  set <cell> <id>      Change one cell of the draft.",
        "  submit               Upload the draft, mark the page checked and move on.",
        "  kind <kind>          Switch kind (character, perks, item, addons, offering, status).",
        "  side <surv|killer>   Switch orientation.",
        "  options <cell>       List the choices for one cell.",
        "  info                 Training-corpus progress.",
        "  crops                Crop image paths of the page in view.",
        "  quit                 Leave.",
    ]
    .join("\n")
}
