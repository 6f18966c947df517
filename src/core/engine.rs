use crate::analytics::ResultAnalytics;
use crate::compute::Compute;
use crate::config::EngineSettings;
use crate::core::highlight::{HighlightEngine, RenderFrame};
use crate::core::history::ConfigHistory;
use crate::core::pair_index::PairIndex;
use crate::core::synonyms::{SelectionStep, SynonymSelector};
use crate::core::types::{ConfigurationOptions, Pair, ProjectState, TextSide};
use crate::error::{ComputationError, EngineError, EngineResult};
use crate::notify::Notification;
use crate::persistence;
use crate::selection::{ResolvedSelection, SelectionResolver};
use std::path::Path;
use tracing::{debug, info, warn};

// The engine exclusively owns the project. Callers get shared references or
// issue commands; nothing mutable escapes.
pub struct AnnotationEngine<C: Compute> {
    compute: C,
    settings: EngineSettings,
    project: Option<ProjectState>,
    history: ConfigHistory,
    selector: SynonymSelector,
    highlighter: HighlightEngine,
}

impl<C: Compute> AnnotationEngine<C> {
    pub fn new(compute: C) -> Self {
        Self::with_settings(compute, EngineSettings::default())
    }

    pub fn with_settings(compute: C, settings: EngineSettings) -> Self {
        Self {
            compute,
            history: ConfigHistory::new(settings.history_limit),
            highlighter: HighlightEngine::new(&settings),
            settings,
            project: None,
            selector: SynonymSelector::default(),
        }
    }

    pub fn project(&self) -> Option<&ProjectState> {
        self.project.as_ref()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn history(&self) -> &ConfigHistory {
        &self.history
    }

    pub fn selector(&self) -> &SynonymSelector {
        &self.selector
    }

    pub fn compute_unit_mut(&mut self) -> &mut C {
        &mut self.compute
    }

    /// First computation for a pair of texts. Replaces any open project and
    /// starts a fresh history.
    pub fn analyze(
        &mut self,
        text_a: String,
        text_b: String,
        config: ConfigurationOptions,
    ) -> EngineResult<Notification> {
        config
            .validate()
            .map_err(ComputationError::InvalidConfiguration)?;
        let len_a = text_a.chars().count();
        let len_b = text_b.chars().count();
        config
            .synonyms
            .validate(len_a, len_b)
            .map_err(ComputationError::InvalidConfiguration)?;

        let mut output = self.compute.compute(&text_a, &text_b, &config)?;
        output.check(len_a, len_b)?;
        reset_holds(&mut output.pairs);
        info!(len_a, len_b, pairs = output.pairs.len(), "Analyzed texts");

        self.install(ProjectState {
            text_a,
            text_b,
            pairs: output.pairs,
            config,
            overall_similarity_a: output.overall_similarity_a,
            overall_similarity_b: output.overall_similarity_b,
        });
        Ok(Notification::success("The texts were analyzed."))
    }

    /// Adopts an already computed project, e.g. one read from disk.
    pub fn load(&mut self, state: ProjectState) -> EngineResult<Notification> {
        state
            .validate()
            .map_err(|e| EngineError::Decode(e.into()))?;
        info!(pairs = state.pairs.len(), "Loaded project");
        self.install(state);
        Ok(Notification::success("The project was opened."))
    }

    pub fn open(&mut self, bytes: &[u8]) -> EngineResult<Notification> {
        let state = persistence::decode(bytes)?;
        self.load(state)
    }

    pub fn open_path(&mut self, path: &Path) -> EngineResult<Notification> {
        let state = persistence::load_from_disk(path)?;
        self.load(state)
    }

    pub fn export(&self) -> EngineResult<Vec<u8>> {
        let project = self.project.as_ref().ok_or(EngineError::NoProject)?;
        Ok(persistence::encode(project)?)
    }

    pub fn save(&self, path: &Path) -> EngineResult<Notification> {
        let project = self.project.as_ref().ok_or(EngineError::NoProject)?;
        persistence::save_to_disk(project, path)?;
        Ok(Notification::success(format!(
            "The project was saved to {}.",
            path.display()
        )))
    }

    fn install(&mut self, state: ProjectState) {
        self.project = Some(state);
        self.history.clear();
        self.selector.reset();
        self.highlighter.pointer_leave();
    }

    /// Applies new settings, remembering the current ones for undo.
    pub fn update_configuration(&mut self, config: ConfigurationOptions) -> EngineResult<Notification> {
        self.recompute(config, true)?;
        Ok(Notification::success(
            "Settings have been updated, and the texts have been reanalyzed.",
        ))
    }

    pub fn undo(&mut self) -> EngineResult<Notification> {
        let snapshot = self.history.pop().ok_or(EngineError::HistoryEmpty)?;
        if let Err(err) = self.recompute(snapshot.clone(), false) {
            warn!(error = %err, "Undo failed, keeping snapshot");
            self.history.restore(snapshot);
            return Err(err);
        }
        info!(remaining = self.history.len(), "Reverted configuration");
        Ok(Notification::success(
            "The previous settings were restored, and the texts were reanalyzed.",
        ))
    }

    /// Runs the compute unit with `config` and swaps in the result.
    ///
    /// Pairs, both summaries and the configuration change together or not at
    /// all. All holds are reset.
    fn recompute(&mut self, config: ConfigurationOptions, add_to_history: bool) -> EngineResult<()> {
        let project = self.project.as_ref().ok_or(EngineError::NoProject)?;
        let len_a = project.text_len(TextSide::A);
        let len_b = project.text_len(TextSide::B);
        config
            .validate()
            .and_then(|_| config.synonyms.validate(len_a, len_b))
            .map_err(ComputationError::InvalidConfiguration)?;

        let mut output = match self.compute.compute(&project.text_a, &project.text_b, &config) {
            Ok(output) => output,
            Err(err) => {
                warn!(error = %err, "Recompute failed, keeping previous result");
                return Err(err.into());
            }
        };
        output.check(len_a, len_b)?;
        reset_holds(&mut output.pairs);

        if add_to_history {
            self.history.push(&project.config);
        }
        debug!(
            pairs = output.pairs.len(),
            history = self.history.len(),
            "Recomputed project"
        );
        let project = self.project.as_mut().ok_or(EngineError::NoProject)?;
        project.pairs = output.pairs;
        project.overall_similarity_a = output.overall_similarity_a;
        project.overall_similarity_b = output.overall_similarity_b;
        project.config = config;
        Ok(())
    }

    pub fn containing_pair(&self, index: usize, side: TextSide) -> Option<&Pair> {
        let project = self.project.as_ref()?;
        PairIndex::new(&project.pairs).containing_pair(index, side)
    }

    pub fn pointer_over(&mut self, side: TextSide, index: usize) {
        self.highlighter.pointer_over(side, index, None);
    }

    /// Hover with an explicit emphasis color for a revealed cosine pair.
    pub fn pointer_over_with(&mut self, side: TextSide, index: usize, color: impl Into<String>) {
        self.highlighter.pointer_over(side, index, Some(color.into()));
    }

    pub fn pointer_leave(&mut self) {
        self.highlighter.pointer_leave();
    }

    /// Toggles the hold flag of the pair under the pointer.
    pub fn pointer_down(&mut self, side: TextSide, index: usize) -> Option<usize> {
        let project = self.project.as_mut()?;
        let toggled = HighlightEngine::toggle_hold(&mut project.pairs, side, index);
        if let Some(position) = toggled {
            debug!(position, hold = project.pairs[position].hold, "Toggled hold");
        }
        toggled
    }

    pub fn render(&self) -> Option<RenderFrame> {
        self.project
            .as_ref()
            .map(|project| self.highlighter.render(project))
    }

    pub fn analytics(&self) -> Option<ResultAnalytics> {
        self.project
            .as_ref()
            .map(|project| ResultAnalytics::from_pairs(&project.pairs))
    }

    /// Feeds one selection into the synonym link state machine. The second
    /// selection, taken from the other text, links both words and reanalyzes.
    pub fn add_synonym<R: SelectionResolver>(
        &mut self,
        resolver: &R,
        range: &R::Range,
    ) -> EngineResult<Notification> {
        let selection = self.resolve(resolver, range)?;
        match self.selector.begin_or_complete(selection)? {
            SelectionStep::AwaitingSecond => {
                debug!(side = %selection.side, first = selection.first, "Awaiting second word");
                Ok(Notification::info("Please select the second word."))
            }
            SelectionStep::Completed { word_a, word_b } => {
                let mut config = self.current_config()?.clone();
                config.synonyms.link(word_a, word_b);
                self.recompute(config, true)?;
                info!(?word_a, ?word_b, "Added synonym");
                Ok(Notification::success(
                    "The synonym was added, and the texts were reanalyzed.",
                ))
            }
        }
    }

    /// Removes the synonym entry exactly covering the selection, with every
    /// reciprocal link, and reanalyzes.
    pub fn remove_synonym<R: SelectionResolver>(
        &mut self,
        resolver: &R,
        range: &R::Range,
    ) -> EngineResult<Notification> {
        let selection = self.resolve(resolver, range)?;
        let word = selection.to_substring();
        let mut config = self.current_config()?.clone();
        config.synonyms.unlink(selection.side, word)?;
        self.recompute(config, true)?;
        info!(side = %selection.side, ?word, "Removed synonym");
        Ok(Notification::success(
            "The synonym was removed, and the texts were reanalyzed.",
        ))
    }

    fn current_config(&self) -> EngineResult<&ConfigurationOptions> {
        self.project
            .as_ref()
            .map(|project| &project.config)
            .ok_or(EngineError::NoProject)
    }

    /// Resolves and bounds-checks a selection. Any failure drops a pending
    /// first word.
    fn resolve<R: SelectionResolver>(
        &mut self,
        resolver: &R,
        range: &R::Range,
    ) -> EngineResult<ResolvedSelection> {
        let project = self.project.as_ref().ok_or(EngineError::NoProject)?;
        let resolved = resolver
            .resolve(range)
            .and_then(|selection| {
                selection.check_bounds(project.text_len(selection.side))?;
                Ok(selection)
            });
        resolved.map_err(|err| {
            warn!(error = %err, "Selection could not be resolved");
            self.selector.reset();
            EngineError::from(err)
        })
    }
}

fn reset_holds(pairs: &mut [Pair]) {
    for pair in pairs {
        pair.hold = true;
    }
}
