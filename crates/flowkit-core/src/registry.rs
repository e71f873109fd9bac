// ── Capability registry ──
//
// Immutable, name-keyed set of capabilities built once at startup and
// shared by the orchestrator. Registration order is preserved so
// discovery output is stable.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};
use tracing::debug;

use crate::capability::{Capability, CapabilityDescriptor, Tool};
use crate::config::ToolContext;
use crate::error::CoreError;
use crate::tools::{
    AddCustomCode, ListCustomCode, ListFormSubmissions, ListForms, ListPages, ListSites,
    PublishSite, UpdatePage,
};

/// Named subsets of the full capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Preset {
    #[default]
    All,
    /// Everything that does not require approval.
    ReadOnly,
    Sites,
    Pages,
    Forms,
    CustomCode,
}

impl Preset {
    /// Capabilities in a named group. `None` for presets decided by flag.
    fn members(self) -> Option<&'static [&'static str]> {
        match self {
            Self::All | Self::ReadOnly => None,
            Self::Sites => Some(&[ListSites::NAME, PublishSite::NAME]),
            Self::Pages => Some(&[ListPages::NAME, UpdatePage::NAME]),
            Self::Forms => Some(&[ListForms::NAME, ListFormSubmissions::NAME]),
            Self::CustomCode => Some(&[ListCustomCode::NAME, AddCustomCode::NAME]),
        }
    }

    fn admits(self, capability: &dyn Capability) -> bool {
        match (self, self.members()) {
            (_, Some(members)) => members.contains(&capability.name()),
            (Self::ReadOnly, None) => !capability.requires_approval(),
            (_, None) => true,
        }
    }
}

#[derive(Clone)]
pub struct CapabilityRegistry {
    capabilities: IndexMap<&'static str, Arc<dyn Capability>>,
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("capabilities", &self.names())
            .finish()
    }
}

impl CapabilityRegistry {
    /// Every capability, sharing one context.
    pub fn new(ctx: &Arc<ToolContext>) -> Self {
        Self::with_preset(ctx, Preset::All)
    }

    pub fn with_preset(ctx: &Arc<ToolContext>, preset: Preset) -> Self {
        let all: [Arc<dyn Capability>; 8] = [
            Arc::new(ListSites::new(Arc::clone(ctx))),
            Arc::new(PublishSite::new(Arc::clone(ctx))),
            Arc::new(ListPages::new(Arc::clone(ctx))),
            Arc::new(UpdatePage::new(Arc::clone(ctx))),
            Arc::new(ListForms::new(Arc::clone(ctx))),
            Arc::new(ListFormSubmissions::new(Arc::clone(ctx))),
            Arc::new(ListCustomCode::new(Arc::clone(ctx))),
            Arc::new(AddCustomCode::new(Arc::clone(ctx))),
        ];

        let capabilities: IndexMap<_, _> = all
            .into_iter()
            .filter(|c| preset.admits(c.as_ref()))
            .map(|c| (c.name(), c))
            .collect();
        debug!(%preset, count = capabilities.len(), "capability registry built");

        Self { capabilities }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Capability>> {
        self.capabilities.get(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.capabilities.keys().copied().collect()
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> Vec<CapabilityDescriptor> {
        self.capabilities.values().map(|c| c.descriptor()).collect()
    }

    /// Names of the capabilities a human must confirm before they run.
    pub fn approval_required(&self) -> Vec<&'static str> {
        self.capabilities
            .values()
            .filter(|c| c.requires_approval())
            .map(|c| c.name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Capability>> {
        self.capabilities.values()
    }

    /// Look up `name` and invoke it with `args`.
    ///
    /// An unknown name is reported as a validation error, like any other
    /// malformed call.
    pub async fn invoke(&self, name: &str, args: Value) -> Result<Value, CoreError> {
        let capability = self
            .get(name)
            .ok_or_else(|| CoreError::validation(format!("unknown capability: {name}")))?;
        capability.invoke(args).await
    }
}
