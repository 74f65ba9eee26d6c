//! Plot ownership and UGC cube persistence for a field.
//!
//! Each plot sits behind its own async mutex. Commit holds it across the
//! save so no cube change can slip in between persisting and reconciling.

use std::sync::Arc;

use fieldhost_domain::{Plot, PlotUpdate};
use fieldhost_shared::CubeMessage;

use super::{FieldError, FieldManager};
use crate::infrastructure::ports::UgcRepo;
use crate::session::GameSession;

impl FieldManager {
    fn plot_handle(&self, number: i32) -> Option<Arc<tokio::sync::Mutex<Plot>>> {
        self.plots.get(&number).map(|entry| entry.value().clone())
    }

    /// Snapshot of a plot.
    pub async fn plot(&self, number: i32) -> Option<Plot> {
        let handle = self.plot_handle(number)?;
        let plot = handle.lock().await;
        Some(plot.clone())
    }

    pub fn plot_numbers(&self) -> Vec<i32> {
        let mut numbers: Vec<i32> = self.plots.iter().map(|entry| *entry.key()).collect();
        numbers.sort_unstable();
        numbers
    }

    /// Apply a plot update coming from outside the field.
    ///
    /// Returns false without mutating anything if the update targets another
    /// map or an unknown plot number.
    pub async fn update_plot_info(&self, update: PlotUpdate) -> bool {
        let info = update.info();
        if info.map_id != self.map_id() {
            tracing::debug!(
                map_id = %self.map_id(),
                update_map_id = %info.map_id,
                "Plot update for another map"
            );
            return false;
        }
        let number = info.number;
        let Some(handle) = self.plot_handle(number) else {
            tracing::debug!(map_id = %self.map_id(), plot = number, "Plot update for unknown plot");
            return false;
        };

        let updated = {
            let mut plot = handle.lock().await;
            match update {
                PlotUpdate::Full(replacement) => *plot = replacement,
                PlotUpdate::Info(info) => plot.patch(&info),
            }
            plot.info.clone()
        };

        self.broadcast(CubeMessage::UpdatePlot(updated));
        true
    }

    /// Persist the cubes of the session's home plots that live in this field,
    /// then rebuild each plot's cube map from what storage returned.
    ///
    /// A storage failure aborts the commit and leaves that plot's cubes as they
    /// were; plots committed before the failure stay committed.
    pub async fn commit_plot(
        &self,
        session: &GameSession,
        repo: &dyn UgcRepo,
    ) -> Result<(), FieldError> {
        let home = session.home().await;
        for number in home.plots_on(self.map_id()) {
            let Some(handle) = self.plot_handle(number) else {
                continue;
            };

            let mut plot = handle.lock().await;
            let cubes = plot.cubes_sorted();
            match repo.save_cubes(&plot.info, &cubes).await {
                Ok(saved) => {
                    plot.replace_cubes(saved);
                    tracing::info!(
                        map_id = %self.map_id(),
                        plot = number,
                        character_id = %session.character_id(),
                        cubes = plot.cubes.len(),
                        "Plot committed"
                    );
                }
                Err(source) => {
                    tracing::error!(
                        map_id = %self.map_id(),
                        plot = number,
                        error = %source,
                        "Failed to save plot cubes"
                    );
                    return Err(FieldError::PlotCommit {
                        map_id: self.map_id().get(),
                        plot_number: number,
                        source,
                    });
                }
            }
        }
        Ok(())
    }

    /// Hydrate plots from storage once per field. Concurrent callers wait for
    /// the same load, and a failed load fails every one of them.
    pub async fn ensure_plots_loaded(&self, repo: &dyn UgcRepo) -> Result<(), FieldError> {
        let loaded = self
            .plots_loaded
            .get_or_init(|| async {
                match self.load_plots(repo).await {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::error!(
                            map_id = %self.map_id(),
                            instance_id = %self.instance_id(),
                            error = %e,
                            "Failed to load plots"
                        );
                        false
                    }
                }
            })
            .await;

        if *loaded {
            Ok(())
        } else {
            Err(FieldError::PlotsUnavailable {
                map_id: self.map_id().get(),
            })
        }
    }

    /// True once plots were hydrated successfully.
    pub fn plots_loaded(&self) -> bool {
        self.plots_loaded.get().copied().unwrap_or(false)
    }

    /// Hydrate plots of this map from storage. Stored plots replace layout
    /// placeholders with the same number. Returns how many were loaded.
    pub async fn load_plots(&self, repo: &dyn UgcRepo) -> Result<usize, FieldError> {
        let plots = repo.load_plots(self.map_id()).await?;
        let count = plots.len();
        for plot in plots {
            let number = plot.number();
            match self.plot_handle(number) {
                Some(handle) => *handle.lock().await = plot,
                None => {
                    self.plots
                        .insert(number, Arc::new(tokio::sync::Mutex::new(plot)));
                }
            }
        }
        tracing::debug!(map_id = %self.map_id(), plots = count, "Plots loaded");
        Ok(count)
    }
}
