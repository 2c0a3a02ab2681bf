//! Project files: the subject, the context and the selected interventions
//! with their inputs, as JSON.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use termico_eval::types::{BuildingSubcategory, MunicipalityFlags};
use termico_eval::{Context, EngineError, InterventionId, InterventionParams, PremiumId, SubjectType};

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("project file not found: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid project file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid inputs in {path}: {source}")]
    Params {
        path: PathBuf,
        #[source]
        source: EngineError,
    },
}

#[derive(Debug, Default, Deserialize)]
struct RawContext {
    #[serde(default)]
    sottocategoria: Option<BuildingSubcategory>,
    #[serde(default)]
    comune: bool,
    #[serde(default)]
    edificio_comunale: bool,
    #[serde(default)]
    piccolo_comune: bool,
}

#[derive(Debug, Deserialize)]
struct RawIntervention {
    id: String,
    #[serde(default)]
    parametri: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawProject {
    soggetto: SubjectType,
    #[serde(default)]
    contesto: RawContext,
    #[serde(default)]
    premi_globali: BTreeSet<PremiumId>,
    #[serde(default)]
    premi: BTreeSet<PremiumId>,
    #[serde(default)]
    interventi: Vec<RawIntervention>,
}

/// A decoded project, ready for evaluation.
#[derive(Debug, Clone)]
pub struct Project {
    pub operator: SubjectType,
    /// Context as declared, before the selection is merged in.
    pub context: Context,
    pub global_premiums: BTreeSet<PremiumId>,
    /// Intervention keys in file order, unknown keys included.
    pub selected: Vec<String>,
    pub inputs: BTreeMap<String, InterventionParams>,
}

impl Project {
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let text = std::fs::read_to_string(path).map_err(|source| ProjectError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let project = Self::decode(&text, path)?;
        debug!(
            path = %path.display(),
            subject = %project.operator,
            interventions = project.selected.len(),
            "project loaded"
        );
        Ok(project)
    }

    fn decode(text: &str, path: &Path) -> Result<Self, ProjectError> {
        let raw: RawProject = serde_json::from_str(text).map_err(|source| ProjectError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut context = Context::new().with_municipality(MunicipalityFlags {
            is_comune: raw.contesto.comune,
            is_edificio_comunale: raw.contesto.edificio_comunale,
            is_piccolo_comune: raw.contesto.piccolo_comune,
        });
        if let Some(subcategory) = raw.contesto.sottocategoria {
            context = context.with_subcategory(subcategory);
        }
        context.selected_premiums = raw.premi;

        let mut selected = Vec::with_capacity(raw.interventi.len());
        let mut inputs = BTreeMap::new();
        let mut seen_ids = BTreeSet::new();
        let mut seen_unknown = BTreeSet::new();
        for entry in raw.interventi {
            let id = InterventionId::parse(&entry.id);
            let first = match id {
                Some(id) => seen_ids.insert(id),
                None => seen_unknown.insert(entry.id.clone()),
            };
            if !first {
                debug!(key = %entry.id, "repeated intervention in project, keeping the first");
                continue;
            }
            // Unknown keys stay in the selection; the engine reports them.
            if let (Some(id), Some(value)) = (id, entry.parametri) {
                let params =
                    InterventionParams::from_json(id, value).map_err(|source| ProjectError::Params {
                        path: path.to_path_buf(),
                        source,
                    })?;
                inputs.insert(entry.id.clone(), params);
            }
            selected.push(entry.id);
        }

        Ok(Project {
            operator: raw.soggetto,
            context,
            global_premiums: raw.premi_globali,
            selected,
            inputs,
        })
    }

    /// Context seen by each intervention: every premium, every known
    /// selected intervention.
    pub fn selection_context(&self) -> Context {
        let mut ctx = self.context.clone();
        ctx.selected_premiums
            .extend(self.global_premiums.iter().copied());
        ctx.selected_interventions
            .extend(self.selected.iter().filter_map(|key| InterventionId::parse(key)));
        ctx
    }

    /// Inputs declared for `id`, or empty inputs of its family.
    pub fn params_for(&self, id: InterventionId) -> InterventionParams {
        self.selected
            .iter()
            .filter(|key| InterventionId::parse(key) == Some(id))
            .find_map(|key| self.inputs.get(key))
            .cloned()
            .unwrap_or_else(|| InterventionParams::empty_for(id))
    }
}
