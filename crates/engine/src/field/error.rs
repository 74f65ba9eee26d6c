use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// Persisting a plot's cubes failed; in-memory cubes were left untouched.
    #[error("Failed to commit plot {plot_number} on map {map_id}: {source}")]
    PlotCommit {
        map_id: i32,
        plot_number: i32,
        #[source]
        source: RepoError,
    },

    /// Hydrating plots from storage failed for this field instance.
    #[error("Plots of map {map_id} could not be loaded")]
    PlotsUnavailable { map_id: i32 },

    #[error(transparent)]
    Repo(#[from] RepoError),
}
