//! Registry of every labeling session and the one currently in view.

use std::collections::BTreeMap;

use crate::catalog::Catalogs;
use crate::options::{self, OptionList};
use crate::predictables::{FullModelType, LabelId, ModelType, Orientation};
use crate::tables::Dataset;

use super::counter::LabelsCounter;
use super::labeler::Labeler;
use super::summary::TcInfo;
use super::LabelerError;

/// Owns the shared tables, the catalogs and one [`Labeler`] per legal kind/orientation pair.
///
/// Exactly one session is active. Switching kind or orientation keeps every other session's
/// cursor where it was and rebuilds the option lists for the new one.
#[derive(Debug)]
pub struct LabelerSelector {
    data: Dataset,
    catalogs: Catalogs,
    labelers: BTreeMap<FullModelType, Labeler>,
    fmt: FullModelType,
    options: Vec<OptionList>,
    options_changed: bool,
}

impl LabelerSelector {
    /// Build every session, move each onto its first page and activate `start`.
    pub fn new(
        data: Dataset,
        catalogs: Catalogs,
        start: FullModelType,
    ) -> Result<Self, LabelerError> {
        let mut labelers = BTreeMap::new();
        for fmt in FullModelType::all() {
            let mut labeler = Labeler::new(&data, fmt)?;
            labeler.next(&data, false)?;
            labelers.insert(fmt, labeler);
        }
        let mut selector = Self {
            data,
            catalogs,
            labelers,
            fmt: start,
            options: Vec::new(),
            options_changed: false,
        };
        selector.reload_options()?;
        tracing::info!(
            sessions = selector.labelers.len(),
            rows = selector.data.labels.len(),
            active = %start,
            "Labeling sessions ready"
        );
        Ok(selector)
    }

    pub fn fmt(&self) -> FullModelType {
        self.fmt
    }

    pub fn model_type(&self) -> ModelType {
        self.fmt.model_type()
    }

    pub fn orientation(&self) -> Orientation {
        self.fmt.orientation()
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    /// Activate another session. Illegal or unknown pairs leave the active one untouched.
    pub fn set_fmt(&mut self, fmt: FullModelType) -> Result<(), LabelerError> {
        if !self.labelers.contains_key(&fmt) {
            return Err(LabelerError::UnknownLabeler(fmt));
        }
        if fmt == self.fmt {
            return Ok(());
        }
        let previous = self.fmt;
        self.fmt = fmt;
        if let Err(err) = self.reload_options() {
            self.fmt = previous;
            return Err(err);
        }
        tracing::debug!(from = %previous, to = %fmt, "active labeler switched");
        Ok(())
    }

    pub fn set_model_type(&mut self, model_type: ModelType) -> Result<(), LabelerError> {
        let fmt = FullModelType::new(model_type, self.orientation())?;
        self.set_fmt(fmt)
    }

    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), LabelerError> {
        let fmt = FullModelType::new(self.model_type(), orientation)?;
        self.set_fmt(fmt)
    }

    pub fn labeler(&self) -> Result<&Labeler, LabelerError> {
        self.labelers
            .get(&self.fmt)
            .ok_or(LabelerError::UnknownLabeler(self.fmt))
    }

    pub fn labeler_for(&self, fmt: FullModelType) -> Result<&Labeler, LabelerError> {
        self.labelers
            .get(&fmt)
            .ok_or(LabelerError::UnknownLabeler(fmt))
    }

    /// Move the active session one page forward.
    pub fn next(&mut self) -> Result<Vec<LabelId>, LabelerError> {
        self.step(false)
    }

    /// Move the active session one page back.
    pub fn previous(&mut self) -> Result<Vec<LabelId>, LabelerError> {
        self.step(true)
    }

    fn step(&mut self, go_back: bool) -> Result<Vec<LabelId>, LabelerError> {
        let fmt = self.fmt;
        let labeler = self
            .labelers
            .get_mut(&fmt)
            .ok_or(LabelerError::UnknownLabeler(fmt))?;
        let labels = labeler.next(&self.data, go_back)?;
        if options::is_correlated(fmt) {
            self.reload_options()?;
        }
        Ok(labels)
    }

    /// Overwrite the active page's labels in the shared table.
    pub fn update_current(&mut self, new_labels: &[LabelId]) -> Result<(), LabelerError> {
        let fmt = self.fmt;
        let labeler = self
            .labelers
            .get_mut(&fmt)
            .ok_or(LabelerError::UnknownLabeler(fmt))?;
        labeler.update_current(&mut self.data, new_labels)
    }

    /// Flag the active page's rows as manually checked for the active kind.
    pub fn mark_current_checked(&mut self) -> Result<usize, LabelerError> {
        let labeler = self
            .labelers
            .get(&self.fmt)
            .ok_or(LabelerError::UnknownLabeler(self.fmt))?;
        labeler.mark_current_checked(&mut self.data)
    }

    /// Option lists of the active page, one per cell.
    pub fn options(&self) -> &[OptionList] {
        &self.options
    }

    /// Option lists if they were rebuilt since the last call.
    pub fn take_options_if_changed(&mut self) -> Option<&[OptionList]> {
        if !self.options_changed {
            return None;
        }
        self.options_changed = false;
        Some(&self.options)
    }

    fn reload_options(&mut self) -> Result<(), LabelerError> {
        let labeler = self
            .labelers
            .get(&self.fmt)
            .ok_or(LabelerError::UnknownLabeler(self.fmt))?;
        self.options = options::options_for(labeler, &self.data, &self.catalogs)?;
        self.options_changed = true;
        Ok(())
    }

    /// Per kind, `[survivor, killer]` counters; zeroed placeholders where a pair is illegal.
    pub fn get_all_counters(&self) -> BTreeMap<ModelType, [LabelsCounter; 2]> {
        ModelType::ALL
            .into_iter()
            .map(|model_type| {
                let counter = |orientation| {
                    FullModelType::new(model_type, orientation)
                        .ok()
                        .and_then(|fmt| self.labelers.get(&fmt))
                        .map(|labeler| labeler.counts().clone())
                        .unwrap_or_else(LabelsCounter::placeholder)
                };
                (
                    model_type,
                    [counter(Orientation::Survivor), counter(Orientation::Killer)],
                )
            })
            .collect()
    }

    /// Training-corpus progress per kind, computed from the live counters.
    pub fn get_tc_info(&self) -> BTreeMap<ModelType, TcInfo> {
        self.get_all_counters()
            .into_iter()
            .map(|(model_type, [surv, killer])| (model_type, TcInfo::from_counters(&surv, &killer)))
            .collect()
    }
}
