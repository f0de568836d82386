//! Interactive VIN edit session.
//!
//! Drives the load → select → edit → save → export flow over a single dump.
//! Each state carries exactly the data it needs, so there is no way to be
//! editing without a set of locations to write to.
//!
//! ```text
//! Empty ─load─▶ Ready ◀──────────────┐
//!          ├──▶ AwaitingSelection ─select─┘
//!          └──▶ NoVinFound
//! Ready ─start_edit─▶ Editing ─save/cancel─▶ Ready ─export─▶ Exported
//! ```

use crate::error::{Error, Result};
use crate::rewrite::fan_out;
use crate::scanner::{ScanReport, ScanStrategy, Scanner};
use crate::vin::Vin;
use bytes::Bytes;
use std::mem;
use tracing::{debug, info};

/// A loaded dump and everything the scan found in it
#[derive(Debug, Clone)]
pub struct Image {
    /// Name of the file the bytes came from
    pub file_name: String,
    /// Bytes as loaded
    pub original: Bytes,
    /// Bytes including every saved edit
    pub working: Bytes,
    /// Every VIN location in `working`, rescanned after each save
    pub locations: ScanReport,
}

impl Image {
    /// True if any edit has been saved
    pub fn is_modified(&self) -> bool {
        self.original != self.working
    }
}

/// What a fresh load found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Exactly one distinct VIN; it is selected automatically
    Unique {
        /// The selected value
        value: Vin,
        /// Number of offsets holding it
        locations: usize,
    },
    /// Several distinct VINs; call [`EditSession::select`]
    AwaitingSelection(Vec<Vin>),
    /// Nothing VIN-like in the image
    NoVinFound,
}

/// Finished session output
#[derive(Debug, Clone)]
pub struct Export {
    /// Suggested download name, e.g. `dump_modified.bin`
    pub file_name: String,
    /// Final image
    pub bytes: Bytes,
    /// VIN the image now carries
    pub value: Vin,
}

/// Session state
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// Nothing loaded
    #[default]
    Empty,
    /// Loaded, but the scan found no VIN
    NoVinFound(Image),
    /// Several VINs found; one must be picked
    AwaitingSelection {
        /// The loaded image
        image: Image,
        /// Distinct values, first-seen order
        choices: Vec<Vin>,
    },
    /// A VIN is selected and can be edited or exported
    Ready {
        /// The loaded image
        image: Image,
        /// The value considered authoritative
        selected: Vin,
        /// Offsets holding `selected`; every save writes exactly these
        targets: Vec<usize>,
    },
    /// The user is typing a replacement
    Editing {
        /// The loaded image
        image: Image,
        /// The value being replaced
        selected: Vin,
        /// Offsets holding `selected`
        targets: Vec<usize>,
        /// Unvalidated replacement text
        pending: String,
    },
    /// The image was handed out; load a new file to continue
    Exported(Export),
}

impl SessionState {
    /// Short state name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::NoVinFound(_) => "without VIN",
            Self::AwaitingSelection { .. } => "awaiting selection",
            Self::Ready { .. } => "ready",
            Self::Editing { .. } => "editing",
            Self::Exported(_) => "exported",
        }
    }
}

/// Single-file VIN editing workflow
#[derive(Debug, Default)]
pub struct EditSession {
    scanner: Scanner,
    state: SessionState,
}

impl EditSession {
    /// Creates an empty session using the default scanner
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session that scans with `scanner`
    pub fn with_scanner(scanner: Scanner) -> Self {
        Self {
            scanner,
            state: SessionState::Empty,
        }
    }

    /// Current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The loaded image, if any
    pub fn image(&self) -> Option<&Image> {
        match &self.state {
            SessionState::NoVinFound(image)
            | SessionState::AwaitingSelection { image, .. }
            | SessionState::Ready { image, .. }
            | SessionState::Editing { image, .. } => Some(image),
            SessionState::Empty | SessionState::Exported(_) => None,
        }
    }

    /// The selected VIN, once there is one
    pub fn selected(&self) -> Option<&Vin> {
        match &self.state {
            SessionState::Ready { selected, .. } | SessionState::Editing { selected, .. } => {
                Some(selected)
            }
            _ => None,
        }
    }

    /// Offsets a save would write to
    pub fn targets(&self) -> Option<&[usize]> {
        match &self.state {
            SessionState::Ready { targets, .. } | SessionState::Editing { targets, .. } => {
                Some(targets)
            }
            _ => None,
        }
    }

    /// Loads a dump, discarding any previous state
    pub fn load(&mut self, file_name: impl Into<String>, bytes: impl Into<Bytes>) -> LoadOutcome {
        let original: Bytes = bytes.into();
        let locations = self.scanner.scan(&original);
        let mut choices = locations.distinct_values();
        let image = Image {
            file_name: file_name.into(),
            working: original.clone(),
            original,
            locations,
        };

        debug!(
            "Loaded {} ({} bytes, {} location(s))",
            image.file_name,
            image.original.len(),
            image.locations.len()
        );

        let (state, outcome) = match choices.len() {
            0 => (SessionState::NoVinFound(image), LoadOutcome::NoVinFound),
            1 => {
                let value = choices.remove(0);
                let targets = image.locations.offsets_of(&value);
                let outcome = LoadOutcome::Unique {
                    value,
                    locations: targets.len(),
                };
                (
                    SessionState::Ready {
                        image,
                        selected: value,
                        targets,
                    },
                    outcome,
                )
            }
            _ => (
                SessionState::AwaitingSelection {
                    image,
                    choices: choices.clone(),
                },
                LoadOutcome::AwaitingSelection(choices),
            ),
        };

        self.state = state;
        outcome
    }

    /// Picks the authoritative VIN among several found
    pub fn select(&mut self, value: &str) -> Result<()> {
        let choices = match &self.state {
            SessionState::AwaitingSelection { choices, .. } => choices,
            other => return Err(Error::invalid_transition("select a VIN", other.name())),
        };

        let selected = choices
            .iter()
            .copied()
            .find(|c| c == value)
            .ok_or_else(|| Error::UnknownVinSelection {
                value: value.to_string(),
            })?;

        if let SessionState::AwaitingSelection { image, .. } = mem::take(&mut self.state) {
            let targets = image.locations.offsets_of(&selected);
            debug!("Selected {} ({} location(s))", selected, targets.len());
            self.state = SessionState::Ready {
                image,
                selected,
                targets,
            };
        }
        Ok(())
    }

    /// Starts editing the selected VIN
    pub fn start_edit(&mut self) -> Result<()> {
        match mem::take(&mut self.state) {
            SessionState::Ready {
                image,
                selected,
                targets,
            } => {
                self.state = SessionState::Editing {
                    image,
                    selected,
                    targets,
                    pending: selected.to_string(),
                };
                Ok(())
            }
            other => {
                let err = Error::invalid_transition("start editing", other.name());
                self.state = other;
                Err(err)
            }
        }
    }

    /// Replaces the pending text; input is upper-cased
    pub fn set_pending(&mut self, text: &str) -> Result<()> {
        match &mut self.state {
            SessionState::Editing { pending, .. } => {
                *pending = text.trim().to_ascii_uppercase();
                Ok(())
            }
            other => Err(Error::invalid_transition("edit", other.name())),
        }
    }

    /// The text being edited
    pub fn pending(&self) -> Option<&str> {
        match &self.state {
            SessionState::Editing { pending, .. } => Some(pending),
            _ => None,
        }
    }

    /// Writes the pending VIN to every location of the selected value.
    ///
    /// The location list is rebuilt from the written image, so windows that
    /// overlap a rewritten range reflect the new bytes. The target offsets
    /// stay fixed even if the new VIN equals another value in the image.
    ///
    /// Returns the number of locations written. On error the session stays
    /// in editing and nothing is changed.
    pub fn save(&mut self) -> Result<usize> {
        let (image, selected, targets, pending) = match &mut self.state {
            SessionState::Editing {
                image,
                selected,
                targets,
                pending,
            } => (image, selected, targets, pending),
            other => return Err(Error::invalid_transition("save", other.name())),
        };

        let vin = Vin::parse(pending)?;
        let working = fan_out(&image.working, &vin, targets)?;

        image.locations = self.scanner.scan(&working);
        image.working = working;
        info!(
            "Replaced {} with {} at {} location(s)",
            selected,
            vin,
            targets.len()
        );

        match mem::take(&mut self.state) {
            SessionState::Editing { image, targets, .. } => {
                let written = targets.len();
                self.state = SessionState::Ready {
                    image,
                    selected: vin,
                    targets,
                };
                Ok(written)
            }
            other => {
                self.state = other;
                Err(Error::invalid_transition("save", "editing"))
            }
        }
    }

    /// Abandons the pending text, keeping the previous value
    pub fn cancel(&mut self) -> Result<()> {
        match mem::take(&mut self.state) {
            SessionState::Editing {
                image,
                selected,
                targets,
                ..
            } => {
                self.state = SessionState::Ready {
                    image,
                    selected,
                    targets,
                };
                Ok(())
            }
            other => {
                let err = Error::invalid_transition("cancel", other.name());
                self.state = other;
                Err(err)
            }
        }
    }

    /// Hands out the working image; the session is finished afterwards
    pub fn export(&mut self) -> Result<Export> {
        match mem::take(&mut self.state) {
            SessionState::Ready {
                image, selected, ..
            } => {
                let export = Export {
                    file_name: modified_file_name(&image.file_name),
                    bytes: image.working,
                    value: selected,
                };
                self.state = SessionState::Exported(export.clone());
                Ok(export)
            }
            other => {
                let err = Error::invalid_transition("export", other.name());
                self.state = other;
                Err(err)
            }
        }
    }

    /// Drops everything and returns to empty
    pub fn reset(&mut self) {
        self.state = SessionState::Empty;
    }
}

/// `dump.bin` → `dump_modified.bin`; names without an extension are kept as is
pub fn modified_file_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => format!("{}_modified.{}", stem, ext),
        _ => name.to_string(),
    }
}
