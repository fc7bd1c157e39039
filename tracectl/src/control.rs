// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Runtime control of log levels.
//!
//! Every declared target has a level and belongs to the tags it was declared
//! with, plus its own name. Levels change per tag; each change rebuilds the
//! filter of the subscriber installed by the control.

use ordermap::{OrderMap, OrderSet};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, OnceLock};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, Registry, filter::LevelFilter, prelude::*, reload};

use crate::display::ByTag;
use crate::targets::{TRACING_TARGETS, TargetDecl, TargetKind};
use crate::trace_target;

trace_target!("tracectl", LevelFilter::INFO, &[]);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TracingCtlError {
    #[error("Invalid level '{0}' for tag '{1}'")]
    InvalidLevel(String, String),
    #[error("Invalid syntax '{0}': it should be tag=loglevel")]
    InvalidSyntax(String),
    #[error("Tag '{0}' is given more than one level")]
    DuplicateTag(String),
}

/// A parsed `tag=level,...` string.
///
/// `default` sets the level of targets nobody declared, `all` the level of
/// every declared target, and any other key names a tag. Tag levels apply
/// after `all`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelDirectives {
    pub default: Option<LevelFilter>,
    pub all: Option<LevelFilter>,
    pub tags: OrderMap<String, LevelFilter>,
}

impl FromStr for LevelDirectives {
    type Err = TracingCtlError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut directives = LevelDirectives::default();
        for item in input.split(',').map(str::trim).filter(|i| !i.is_empty()) {
            let Some((key, level)) = item.split_once('=') else {
                return Err(TracingCtlError::InvalidSyntax(item.to_string()));
            };
            let (key, level) = (key.trim(), level.trim());
            if key.is_empty() {
                return Err(TracingCtlError::InvalidSyntax(item.to_string()));
            }
            let level = LevelFilter::from_str(level)
                .map_err(|_| TracingCtlError::InvalidLevel(level.to_string(), key.to_string()))?;
            let slot = match key {
                "default" => &mut directives.default,
                "all" => &mut directives.all,
                tag => {
                    if directives.tags.insert(tag.to_string(), level).is_some() {
                        return Err(TracingCtlError::DuplicateTag(tag.to_string()));
                    }
                    continue;
                }
            };
            if slot.replace(level).is_some() {
                return Err(TracingCtlError::DuplicateTag(key.to_string()));
            }
        }
        Ok(directives)
    }
}

/// The current configuration of one target
#[derive(Debug, Clone)]
pub struct TargetCfg {
    pub(crate) target: &'static str,
    pub(crate) name: &'static str,
    pub(crate) level: LevelFilter,
    pub(crate) tags: Vec<&'static str>,
    pub(crate) kind: TargetKind,
}

impl TargetCfg {
    fn from_decl(decl: &TargetDecl) -> Self {
        let mut tags = decl.tags.to_vec();
        if !tags.contains(&decl.name) {
            tags.push(decl.name);
        }
        Self {
            target: decl.target,
            name: decl.name,
            level: decl.level,
            tags,
            kind: decl.kind,
        }
    }
    #[must_use]
    pub fn target(&self) -> &'static str {
        self.target
    }
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
    #[must_use]
    pub fn level(&self) -> LevelFilter {
        self.level
    }
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.kind == TargetKind::Custom
    }
}

/// A tag and the targets it addresses
#[derive(Debug, Clone)]
pub struct Tag {
    pub(crate) name: &'static str,
    pub(crate) targets: OrderSet<&'static str>,
}

impl Tag {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
    #[must_use]
    pub fn targets(&self) -> &OrderSet<&'static str> {
        &self.targets
    }
}

/// Levels of all known targets, indexed by target and by tag
#[derive(Debug)]
pub(crate) struct TargetRegistry {
    pub(crate) default: LevelFilter,
    pub(crate) targets: OrderMap<&'static str, TargetCfg>,
    pub(crate) tags: OrderMap<&'static str, Tag>,
}

impl TargetRegistry {
    pub(crate) fn new<'d>(default: LevelFilter, decls: impl IntoIterator<Item = &'d TargetDecl>) -> Self {
        let mut registry = Self {
            default,
            targets: OrderMap::new(),
            tags: OrderMap::new(),
        };
        for decl in decls {
            registry.declare(decl);
        }
        registry
    }

    fn declare(&mut self, decl: &TargetDecl) {
        let cfg = TargetCfg::from_decl(decl);
        for &tag in &cfg.tags {
            self.tags
                .entry(tag)
                .or_insert_with(|| Tag { name: tag, targets: OrderSet::new() })
                .targets
                .insert(decl.target);
        }
        if self.targets.insert(decl.target, cfg).is_some() {
            warn!("Tracing target {} is declared more than once", decl.target);
        }
    }

    pub(crate) fn filter(&self) -> EnvFilter {
        self.targets.values().fold(EnvFilter::new(self.default.to_string()), |filter, cfg| {
            match format!("{}={}", cfg.target, cfg.level).parse() {
                Ok(directive) => filter.add_directive(directive),
                Err(e) => {
                    error!("Ignoring level of target {}: {e}", cfg.target);
                    filter
                }
            }
        })
    }

    /// Set the level of the targets of a tag. Returns how many changed.
    pub(crate) fn set_tag(&mut self, tag: &str, level: LevelFilter) -> usize {
        let Some(members) = self.tags.get(tag) else {
            return 0;
        };
        let mut changed = 0;
        for target in &members.targets {
            if let Some(cfg) = self.targets.get_mut(target)
                && cfg.level != level
            {
                cfg.level = level;
                changed += 1;
            }
        }
        changed
    }

    /// Apply directives, returning the tags nothing is declared with
    pub(crate) fn apply(&mut self, directives: &LevelDirectives) -> Vec<String> {
        if let Some(level) = directives.default {
            self.default = level;
        }
        if let Some(level) = directives.all {
            self.targets.values_mut().for_each(|cfg| cfg.level = level);
        }
        let mut unknown = Vec::new();
        for (tag, level) in &directives.tags {
            if !self.tags.contains_key(tag.as_str()) {
                unknown.push(tag.clone());
            }
            self.set_tag(tag, *level);
        }
        unknown
    }

    pub(crate) fn directives(&self) -> LevelDirectives {
        LevelDirectives {
            default: Some(self.default),
            all: None,
            tags: self
                .targets
                .values()
                .map(|cfg| (cfg.name.to_string(), cfg.level))
                .collect(),
        }
    }
}

impl std::fmt::Display for LevelDirectives {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let item = |key: &str, level: &LevelFilter| format!("{key}={}", level.to_string().to_lowercase());
        let items: Vec<String> = [("default", self.default), ("all", self.all)]
            .iter()
            .filter_map(|(key, level)| level.as_ref().map(|level| item(key, level)))
            .chain(self.tags.iter().map(|(tag, level)| item(tag, level)))
            .collect();
        write!(f, "{}", items.join(","))
    }
}

/// Process-wide control of the tracing subscriber and of target levels
#[derive(Debug)]
pub struct TracingControl {
    registry: Mutex<TargetRegistry>,
    handle: Option<reload::Handle<EnvFilter, Registry>>,
}

static TRACING_CTL: OnceLock<TracingControl> = OnceLock::new();

/// The process-wide [`TracingControl`], installing the subscriber on first use
pub fn get_trace_ctl() -> &'static TracingControl {
    TRACING_CTL.get_or_init(TracingControl::install)
}

impl TracingControl {
    fn install() -> Self {
        let registry = TargetRegistry::new(LevelFilter::INFO, TRACING_TARGETS.iter());
        let (filter, handle) = reload::Layer::new(registry.filter());
        let output = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .with_thread_names(true);
        // a test harness may own the global subscriber already
        let handle = match tracing_subscriber::registry().with(filter).with(output).try_init() {
            Ok(()) => Some(handle),
            Err(e) => {
                warn!("Log levels will not be applied: {e}");
                None
            }
        };
        Self {
            registry: Mutex::new(registry),
            handle,
        }
    }

    fn registry(&self) -> MutexGuard<'_, TargetRegistry> {
        self.registry
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn refresh(&self, registry: &TargetRegistry) {
        if let Some(handle) = &self.handle
            && let Err(e) = handle.reload(registry.filter())
        {
            error!("Could not apply log levels: {e}");
        }
    }

    /// Set the level of every target of a tag
    pub fn set_tag_level(&self, tag: &str, level: LevelFilter) {
        let mut registry = self.registry();
        let changed = registry.set_tag(tag, level);
        if changed > 0 {
            self.refresh(&registry);
        }
        info!("Tag '{tag}' set to {level}, {changed} targets changed");
    }

    /// Set the level of targets no one declared
    pub fn set_default_level(&self, level: LevelFilter) {
        let mut registry = self.registry();
        if registry.default != level {
            registry.default = level;
            self.refresh(&registry);
        }
    }

    #[must_use]
    pub fn default_level(&self) -> LevelFilter {
        self.registry().default
    }

    /// Check a `tag=level,...` string without applying it
    ///
    /// # Errors
    ///
    /// Fails if the string does not parse.
    pub fn validate_config_string(input: &str) -> Result<(), TracingCtlError> {
        input.parse::<LevelDirectives>().map(|_| ())
    }

    /// Parse and apply a `tag=level,...` string. Tags no target is declared
    /// with are reported and skipped.
    ///
    /// # Errors
    ///
    /// Fails if the string does not parse, in which case nothing changes.
    pub fn setup_from_string(&self, input: &str) -> Result<(), TracingCtlError> {
        let directives: LevelDirectives = input.parse()?;
        self.apply(&directives);
        Ok(())
    }

    pub fn apply(&self, directives: &LevelDirectives) {
        let mut registry = self.registry();
        for tag in registry.apply(directives) {
            warn!("No tracing target is tagged '{tag}'");
        }
        self.refresh(&registry);
    }

    #[must_use]
    pub fn tag(&self, tag: &str) -> Option<Tag> {
        self.registry().tags.get(tag).cloned()
    }
    #[must_use]
    pub fn target(&self, target: &str) -> Option<TargetCfg> {
        self.registry().targets.get(target).cloned()
    }
    #[must_use]
    pub fn targets_by_tag(&self, tag: &str) -> Vec<TargetCfg> {
        let registry = self.registry();
        registry
            .tags
            .get(tag)
            .into_iter()
            .flat_map(|t| t.targets.iter())
            .filter_map(|target| registry.targets.get(target).cloned())
            .collect()
    }

    /// The current levels, as a string [`TracingControl::setup_from_string`]
    /// accepts
    #[must_use]
    pub fn as_config_string(&self) -> String {
        self.registry().directives().to_string()
    }

    pub fn dump(&self) {
        info!("{}", *self.registry());
    }
    pub fn dump_targets_by_tag(&self) {
        info!("{}", ByTag(&self.registry()));
    }
}
