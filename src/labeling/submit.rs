//! Upload a corrected page, then commit it locally and move on.

use thiserror::Error;

use crate::api::{ApiError, LabelValues, Uploader};
use crate::predictables::{LabelId, MatchId, PlayerId};

use super::selector::LabelerSelector;
use super::LabelerError;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Labeler(#[from] LabelerError),
    /// Upload of one player failed; nothing was written locally.
    #[error("Upload failed for match {match_id}, player {player_id}: {source}")]
    Upstream {
        match_id: MatchId,
        player_id: PlayerId,
        #[source]
        source: ApiError,
    },
}

/// Upload `new_labels` (player-major, one per cell) for the active page.
///
/// Every player is uploaded before anything changes locally. Once all uploads succeed the
/// labels are written to the table, the rows are flagged as manually checked for the kind and
/// the active session moves to the next page. Returns the new page's labels.
pub fn submit_page(
    selector: &mut LabelerSelector,
    uploader: &dyn Uploader,
    new_labels: &[LabelId],
) -> Result<Vec<LabelId>, SubmitError> {
    let labeler = selector.labeler()?;
    let fmt = labeler.fmt();
    if new_labels.len() != labeler.total_cells() {
        return Err(LabelerError::WrongLabelCount {
            expected: labeler.total_cells(),
            got: new_labels.len(),
        }
        .into());
    }
    labeler.current_rows()?;

    for (player_index, values) in labeler.wrap(new_labels).into_iter().enumerate() {
        let (match_id, player_id) = labeler.get_key(player_index)?;
        uploader
            .submit(match_id, player_id, fmt, &LabelValues::from_slice(values))
            .map_err(|source| SubmitError::Upstream {
                match_id,
                player_id,
                source,
            })?;
    }

    selector.update_current(new_labels)?;
    let checked = selector.mark_current_checked()?;
    tracing::info!(%fmt, rows = checked, "Submitted page");
    Ok(selector.next()?)
}
