//! Transitive skill resolution with cycle detection.
//!
//! Walks the dependency graph depth-first from a root skill using an explicit
//! frame stack. Skills are emitted in post-order (dependencies before their
//! dependents, root last). Includes, context files, templates and declared
//! structure entries are leaf resources: they are checked for existence but
//! never traversed.
//!
//! Identifiers are canonicalised before use, so `auth`, `./auth` and ` auth`
//! are one skill.
//!
//! Only failures of the root skill abort a resolution. Everything below the
//! root is fail-soft and ends up on the closure's validation report.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use skillpro_types::error::SkillError;
use skillpro_types::resolve::{ResolutionClosure, ResolvedResource, ResolverOptions, ResourceKind};
use skillpro_types::skill::{ParsedSkill, ReferenceKind};
use skillpro_types::validation::{IssueCode, ValidationError, ValidationResult, ValidationWarning};

use super::loader::SkillLoader;
use super::paths::{canonical_skill_id, resolve_within};
use super::validator::validate;
use crate::cache::{NoopCache, SkillCache};

/// Resolves skills through a loader, consulting a shared cache.
///
/// A resolver holds no per-call state, so one instance can serve concurrent
/// `resolve` calls from several threads.
pub struct SkillResolver<L> {
    loader: L,
    cache: Arc<dyn SkillCache>,
}

impl<L: SkillLoader> SkillResolver<L> {
    pub fn new(loader: L, cache: Arc<dyn SkillCache>) -> Self {
        Self { loader, cache }
    }

    /// Resolver that never caches.
    pub fn uncached(loader: L) -> Self {
        Self::new(loader, Arc::new(NoopCache))
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn cache(&self) -> &Arc<dyn SkillCache> {
        &self.cache
    }

    /// Resolve `root` and everything reachable from it.
    ///
    /// Fails only when the root itself cannot be located, read or parsed.
    pub fn resolve(
        &self,
        root: &str,
        options: &ResolverOptions,
    ) -> Result<ResolutionClosure, SkillError> {
        tracing::debug!(
            root = %root,
            base = %options.base_path.display(),
            cache = options.cache,
            "Resolving skill"
        );

        let root = canonical_skill_id(root).unwrap_or_else(|| root.to_owned());
        let root = root.as_str();
        let root_skill = self.fetch(root, options).inspect_err(|e| {
            tracing::warn!(root = %root, error = %e, "Failed to load root skill");
        })?;

        let mut walk = Walk::new(self, options);
        walk.run(root_skill);
        let closure = walk.finish(root);

        tracing::info!(
            root = %root,
            skills = closure.order.len(),
            resources = closure.resources.len(),
            errors = closure.validation.errors.len(),
            warnings = closure.validation.warnings.len(),
            "Resolved skill"
        );
        Ok(closure)
    }

    /// Load a skill, cache-first when caching is enabled.
    ///
    /// A cached copy whose fingerprint no longer matches the loader's is
    /// invalidated and reloaded.
    fn fetch(&self, skill_id: &str, options: &ResolverOptions) -> Result<ParsedSkill, SkillError> {
        let base = options.base_path.as_path();

        if options.cache {
            if let Some(cached) = self.cache.get(skill_id) {
                if self.is_fresh(&cached, base, skill_id) {
                    tracing::debug!(skill = %skill_id, "Cache hit");
                    return Ok(cached);
                }
                tracing::debug!(skill = %skill_id, "Cached skill changed on disk, reloading");
                self.cache.invalidate(skill_id);
            } else {
                tracing::debug!(skill = %skill_id, "Cache miss");
            }
        }

        let skill = self.loader.load(base, skill_id)?;

        if options.cache {
            if skill.is_cacheable() {
                self.cache
                    .put(skill_id, skill.clone(), options.cache_ttl_secs);
            } else {
                tracing::debug!(skill = %skill_id, "Skill opted out of caching");
            }
        }
        Ok(skill)
    }

    fn is_fresh(&self, cached: &ParsedSkill, base: &Path, skill_id: &str) -> bool {
        match &cached.fingerprint {
            None => true,
            Some(stored) => self
                .loader
                .fingerprint(base, skill_id)
                .is_some_and(|current| &current == stored),
        }
    }
}

impl<L> std::fmt::Debug for SkillResolver<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillResolver").finish_non_exhaustive()
    }
}

/// A skill currently on the traversal stack.
struct Frame {
    skill: ParsedSkill,
    next_dependency: usize,
}

/// Per-call traversal state.
struct Walk<'r, L> {
    resolver: &'r SkillResolver<L>,
    options: &'r ResolverOptions,
    frames: Vec<Frame>,
    on_stack: HashSet<String>,
    done: HashSet<String>,
    failed: HashMap<String, SkillError>,
    /// Frontmatter name -> first identifier that declared it.
    names: HashMap<String, String>,
    order: Vec<String>,
    skills: BTreeMap<String, ParsedSkill>,
    resources: Vec<ResolvedResource>,
    validation: ValidationResult,
}

enum Step {
    Descend(ParsedSkill),
    Skip,
}

impl<'r, L: SkillLoader> Walk<'r, L> {
    fn new(resolver: &'r SkillResolver<L>, options: &'r ResolverOptions) -> Self {
        Self {
            resolver,
            options,
            frames: Vec::new(),
            on_stack: HashSet::new(),
            done: HashSet::new(),
            failed: HashMap::new(),
            names: HashMap::new(),
            order: Vec::new(),
            skills: BTreeMap::new(),
            resources: Vec::new(),
            validation: ValidationResult::new(),
        }
    }

    fn run(&mut self, root: ParsedSkill) {
        self.enter(root);

        while let Some(frame) = self.frames.last_mut() {
            let next = if self.options.resolve_skills {
                frame.skill.dependencies.get(frame.next_dependency).cloned()
            } else {
                None
            };
            let Some(dependency) = next else {
                if let Some(frame) = self.frames.pop() {
                    self.leave(frame);
                }
                continue;
            };
            frame.next_dependency += 1;

            if let Step::Descend(skill) = self.step(&dependency) {
                self.enter(skill);
            }
        }
    }

    /// Decide what to do with the edge from the top frame to `dependency`.
    ///
    /// State is keyed by the canonical identifier; `dependency` as written is
    /// kept for the optional lookup and for messages.
    fn step(&mut self, dependency: &str) -> Step {
        if dependency.trim().is_empty() {
            // Reported by the validator as EMPTY_DEPENDENCY.
            return Step::Skip;
        }
        // Rejected identifiers keep their spelling and fail in the loader.
        let id = canonical_skill_id(dependency).unwrap_or_else(|| dependency.to_owned());

        if self.on_stack.contains(&id) {
            self.report_cycle(&id);
            return Step::Skip;
        }
        if self.done.contains(&id) {
            return Step::Skip;
        }
        if let Some(err) = self.failed.get(&id).cloned() {
            self.report_unresolved(dependency, &err);
            return Step::Skip;
        }

        match self.resolver.fetch(&id, self.options) {
            Ok(skill) => Step::Descend(skill),
            Err(err) => {
                self.report_unresolved(dependency, &err);
                self.failed.insert(id, err);
                Step::Skip
            }
        }
    }

    fn enter(&mut self, skill: ParsedSkill) {
        tracing::trace!(skill = %skill.id, depth = self.frames.len(), "Entering skill");

        self.validation
            .merge(validate(&skill, &self.options.base_path));
        self.check_duplicate_name(&skill);
        if self.options.resolve_includes {
            self.collect_resources(&skill, ResourceKind::Include);
        }
        if self.options.resolve_context {
            self.collect_resources(&skill, ResourceKind::Context);
        }
        if self.options.resolve_templates {
            self.collect_resources(&skill, ResourceKind::Template);
        }
        if self.options.check_structure {
            self.collect_resources(&skill, ResourceKind::Script);
            self.collect_resources(&skill, ResourceKind::Types);
        }

        self.on_stack.insert(skill.id.clone());
        self.frames.push(Frame {
            skill,
            next_dependency: 0,
        });
    }

    fn leave(&mut self, frame: Frame) {
        let id = frame.skill.id.clone();
        self.on_stack.remove(&id);
        self.done.insert(id.clone());
        self.order.push(id.clone());
        self.skills.insert(id, frame.skill);
    }

    fn finish(self, root: &str) -> ResolutionClosure {
        ResolutionClosure {
            root: root.to_owned(),
            order: self.order,
            skills: self.skills,
            resources: self.resources,
            validation: self.validation,
        }
    }

    fn check_duplicate_name(&mut self, skill: &ParsedSkill) {
        let name = skill.frontmatter.name.trim();
        if name.is_empty() {
            return;
        }
        match self.names.get(name) {
            Some(first) if first != &skill.id => {
                let message = format!(
                    "Skills '{first}' and '{}' both declare the name '{name}'",
                    skill.id
                );
                self.validation.push_error(
                    ValidationError::new(IssueCode::DuplicateSkillName, message)
                        .with_file(skill.location.display().to_string()),
                );
            }
            Some(_) => {}
            None => {
                self.names.insert(name.to_owned(), skill.id.clone());
            }
        }
    }

    fn collect_resources(&mut self, skill: &ParsedSkill, kind: ResourceKind) {
        let (entries, marker) = match kind {
            ResourceKind::Include => (&skill.includes, Some(ReferenceKind::Include)),
            ResourceKind::Context => (&skill.context, Some(ReferenceKind::Load)),
            ResourceKind::Template => (&skill.templates, Some(ReferenceKind::Template)),
            ResourceKind::Script => (&skill.frontmatter.scripts, None),
            ResourceKind::Types => (&skill.frontmatter.types, None),
        };
        let base = self.options.base_path.as_path();
        let file = skill.location.display().to_string();

        for requested in entries {
            // Escaping paths are never checked on disk; the validator reports them.
            let Some(path) = resolve_within(skill.directory(), requested) else {
                continue;
            };
            let reference = marker.and_then(|m| skill.reference_for(m, requested));

            if self.resolver.loader.resource_exists(base, &path) {
                self.resources.push(ResolvedResource {
                    kind,
                    requested: requested.clone(),
                    path,
                    origin: skill.id.clone(),
                    line: reference.map(|r| r.line),
                    column: reference.map(|r| r.column),
                });
                continue;
            }

            tracing::debug!(
                skill = %skill.id,
                kind = %kind,
                path = %path.display(),
                "Referenced resource not found"
            );
            let line = reference.map(|r| r.line);
            match kind {
                ResourceKind::Include => self.validation.push_error(
                    ValidationError::new(
                        IssueCode::IncludeNotFound,
                        format!("Include '{requested}' of skill '{}' was not found", skill.id),
                    )
                    .with_file(file.clone())
                    .with_line(line),
                ),
                ResourceKind::Template => self.validation.push_error(
                    ValidationError::new(
                        IssueCode::TemplateNotFound,
                        format!("Template '{requested}' of skill '{}' was not found", skill.id),
                    )
                    .with_file(file.clone())
                    .with_line(line),
                ),
                ResourceKind::Context => self.validation.push_warning(
                    ValidationWarning::new(
                        IssueCode::ContextNotFound,
                        format!(
                            "Context file '{requested}' of skill '{}' was not found",
                            skill.id
                        ),
                    )
                    .with_file(file.clone()),
                ),
                ResourceKind::Script => self.validation.push_warning(
                    ValidationWarning::new(
                        IssueCode::ScriptNotFound,
                        format!("Script '{requested}' of skill '{}' was not found", skill.id),
                    )
                    .with_file(file.clone()),
                ),
                ResourceKind::Types => self.validation.push_warning(
                    ValidationWarning::new(
                        IssueCode::TypesNotFound,
                        format!(
                            "Type definitions '{requested}' of skill '{}' were not found",
                            skill.id
                        ),
                    )
                    .with_file(file.clone()),
                ),
            }
        }
    }

    fn report_cycle(&mut self, dependency: &str) {
        let start = self
            .frames
            .iter()
            .position(|f| f.skill.id == dependency)
            .unwrap_or(0);
        let mut cycle: Vec<String> = self.frames[start..]
            .iter()
            .map(|f| f.skill.id.clone())
            .collect();
        cycle.push(dependency.to_owned());

        let file = self
            .frames
            .last()
            .map(|f| f.skill.location.display().to_string());
        let err = SkillError::CyclicDependency { cycle };
        tracing::warn!(error = %err, "Dependency cycle");

        let mut finding = ValidationError::new(err.code(), err.to_string());
        if let Some(file) = file {
            finding = finding.with_file(file);
        }
        self.validation.push_error(finding);
    }

    fn report_unresolved(&mut self, dependency: &str, cause: &SkillError) {
        let Some(dependent) = self.frames.last().map(|f| &f.skill) else {
            return;
        };
        let file = dependent.location.display().to_string();

        if dependent.is_optional_dependency(dependency) {
            tracing::debug!(
                skill = %dependent.id,
                dependency = %dependency,
                error = %cause,
                "Optional dependency unavailable"
            );
            let message = format!(
                "Optional dependency '{dependency}' of skill '{}' could not be resolved: {cause}",
                dependent.id
            );
            self.validation.push_warning(
                ValidationWarning::new(IssueCode::UnresolvedOptionalDependency, message)
                    .with_file(file),
            );
        } else {
            tracing::warn!(
                skill = %dependent.id,
                dependency = %dependency,
                error = %cause,
                "Mandatory dependency unavailable"
            );
            let err = SkillError::UnresolvedMandatoryDependency {
                dependent: dependent.id.clone(),
                skill: dependency.to_owned(),
            };
            self.validation.push_error(
                ValidationError::new(err.code(), format!("{err}: {cause}")).with_file(file),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::skill::loader::MemoryLoader;

    fn doc(name: &str, deps: &[&str]) -> String {
        let mut text = format!("---\nname: {name}\ndescription: {name} skill\n");
        if !deps.is_empty() {
            text.push_str("dependencies:\n");
            for dep in deps {
                text.push_str(&format!("  - {dep}\n"));
            }
        }
        text.push_str("---\nBody.\n");
        text
    }

    fn options() -> ResolverOptions {
        ResolverOptions::new("/skills")
    }

    const API_DESIGN: &str = "\
---
name: api-design
description: API design guidance
dependencies:
  - skill: auth
---
# API Design

Use include:./snippets/foo.md for shared errors.
";

    fn api_design_loader() -> Arc<MemoryLoader> {
        Arc::new(
            MemoryLoader::new()
                .with_document("api-design/SKILL.md", API_DESIGN)
                .with_document("auth.md", doc("auth", &[]))
                .with_resource("api-design/snippets/foo.md"),
        )
    }

    #[test]
    fn test_api_design_scenario() {
        let resolver = SkillResolver::uncached(api_design_loader());
        let closure = resolver.resolve("api-design", &options()).unwrap();

        assert_eq!(closure.root, "api-design");
        assert_eq!(closure.order, vec!["auth", "api-design"]);
        assert!(closure.is_valid(), "{:?}", closure.validation.errors);

        let includes: Vec<_> = closure.resources_of(ResourceKind::Include).collect();
        assert_eq!(includes.len(), 1);
        assert_eq!(includes[0].requested, "./snippets/foo.md");
        assert_eq!(includes[0].path, Path::new("api-design/snippets/foo.md"));
        assert_eq!(includes[0].origin, "api-design");
        assert_eq!(includes[0].line, Some(9));
        assert_eq!(includes[0].column, Some(5));
    }

    #[test]
    fn test_two_node_cycle_terminates_and_is_reported() {
        let loader = MemoryLoader::new()
            .with_document("a.md", doc("a", &["b"]))
            .with_document("b.md", doc("b", &["a"]));
        let resolver = SkillResolver::uncached(loader);
        let closure = resolver.resolve("a", &options()).unwrap();

        assert_eq!(closure.order, vec!["b", "a"]);
        assert!(!closure.is_valid());
        let cycles: Vec<_> = closure
            .validation
            .errors_with(IssueCode::CyclicDependency)
            .collect();
        assert_eq!(cycles.len(), 1);
        assert!(cycles[0].message.contains("a -> b -> a"));
        assert_eq!(cycles[0].file.as_deref(), Some("b.md"));
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let loader = MemoryLoader::new().with_document("a.md", doc("a", &["a"]));
        let closure = SkillResolver::uncached(loader)
            .resolve("a", &options())
            .unwrap();
        assert_eq!(closure.order, vec!["a"]);
        assert!(closure.validation.errors[0].message.contains("a -> a"));
    }

    #[test]
    fn test_aliased_identifiers_load_once() {
        let loader = Arc::new(
            MemoryLoader::new()
                .with_document(
                    "root.md",
                    "---\nname: root\ndescription: r\ndependencies:\n  - auth\n  - ./auth\n  - \" auth\"\n---\n",
                )
                .with_document("auth.md", doc("auth", &[])),
        );
        let closure = SkillResolver::uncached(loader.clone())
            .resolve("./root", &options())
            .unwrap();

        assert_eq!(closure.root, "root");
        assert_eq!(closure.order, vec!["auth", "root"]);
        assert_eq!(loader.load_count(), 2);
        assert!(closure.is_valid(), "{:?}", closure.validation.errors);
    }

    #[test]
    fn test_aliased_self_dependency_names_canonical_cycle() {
        let loader = MemoryLoader::new().with_document("a.md", doc("a", &["./a"]));
        let closure = SkillResolver::uncached(loader)
            .resolve("a", &options())
            .unwrap();

        assert_eq!(closure.order, vec!["a"]);
        let cycles: Vec<_> = closure
            .validation
            .errors_with(IssueCode::CyclicDependency)
            .collect();
        assert_eq!(cycles.len(), 1);
        assert!(cycles[0].message.ends_with("a -> a"), "{}", cycles[0].message);
    }

    #[test]
    fn test_diamond_loads_shared_dependency_once() {
        let loader = Arc::new(
            MemoryLoader::new()
                .with_document("root.md", doc("root", &["left", "right"]))
                .with_document("left.md", doc("left", &["shared"]))
                .with_document("right.md", doc("right", &["shared"]))
                .with_document("shared.md", doc("shared", &[])),
        );
        let resolver = SkillResolver::uncached(loader.clone());
        let closure = resolver.resolve("root", &options()).unwrap();

        assert_eq!(closure.order, vec!["shared", "left", "right", "root"]);
        assert_eq!(closure.skills.len(), 4);
        assert_eq!(loader.load_count(), 4);
        assert!(closure.is_valid());
    }

    #[test]
    fn test_optional_missing_dependency_is_a_warning() {
        let loader = MemoryLoader::new().with_document(
            "root.md",
            "---\nname: root\ndescription: r\ndependencies:\n  - { skill: extra, optional: true }\n---\n",
        );
        let closure = SkillResolver::uncached(loader)
            .resolve("root", &options())
            .unwrap();
        assert!(closure.is_valid());
        assert!(
            closure
                .validation
                .has_warning(IssueCode::UnresolvedOptionalDependency)
        );
        assert_eq!(closure.order, vec!["root"]);
    }

    #[test]
    fn test_mandatory_missing_dependency_is_an_error() {
        let loader = MemoryLoader::new().with_document("root.md", doc("root", &["extra"]));
        let closure = SkillResolver::uncached(loader)
            .resolve("root", &options())
            .unwrap();
        assert!(!closure.is_valid());
        let errors = closure
            .validation
            .errors_with(IssueCode::UnresolvedMandatoryDependency)
            .collect::<Vec<_>>();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("'extra'"));
        assert!(errors[0].message.contains("not found"));
    }

    #[test]
    fn test_marker_dependencies_are_mandatory() {
        let loader = MemoryLoader::new().with_document(
            "root.md",
            "---\nname: root\ndescription: r\n---\nSee skill:ghost.\n",
        );
        let closure = SkillResolver::uncached(loader)
            .resolve("root", &options())
            .unwrap();
        assert!(
            closure
                .validation
                .has_error(IssueCode::UnresolvedMandatoryDependency)
        );
    }

    #[test]
    fn test_failed_loads_are_memoised_but_every_edge_is_reported() {
        let loader = Arc::new(
            MemoryLoader::new()
                .with_document("root.md", doc("root", &["left", "right"]))
                .with_document("left.md", doc("left", &["broken"]))
                .with_document("right.md", doc("right", &["broken"]))
                .with_document("broken.md", "---\nname: [unclosed\n---\n"),
        );
        let closure = SkillResolver::uncached(loader.clone())
            .resolve("root", &options())
            .unwrap();

        let errors = closure
            .validation
            .errors_with(IssueCode::UnresolvedMandatoryDependency)
            .collect::<Vec<_>>();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("malformed frontmatter"));
        // root, left, broken, right
        assert_eq!(loader.load_count(), 4);
        assert!(closure.skill("broken").is_none());
    }

    #[test]
    fn test_root_failures_are_fatal() {
        let loader = MemoryLoader::new().with_document("bad.md", "---\nname: [unclosed\n---\n");
        let resolver = SkillResolver::uncached(loader);

        let err = resolver.resolve("missing", &options()).unwrap_err();
        assert!(matches!(err, SkillError::SkillNotFound { .. }));

        let err = resolver.resolve("bad", &options()).unwrap_err();
        assert!(matches!(err, SkillError::MalformedFrontmatter { .. }));

        let err = resolver.resolve("../etc/passwd", &options()).unwrap_err();
        assert!(matches!(err, SkillError::PathTraversal { .. }));
    }

    #[test]
    fn test_headerless_root_resolves_with_findings() {
        let loader = MemoryLoader::new().with_document("plain.md", "Just some text.\n");
        let closure = SkillResolver::uncached(loader)
            .resolve("plain", &options())
            .unwrap();
        let skill = closure.skill("plain").unwrap();
        assert!(skill.frontmatter.name.is_empty());
        assert!(skill.frontmatter.description.is_empty());
        assert_eq!(
            closure
                .validation
                .errors_with(IssueCode::MissingRequiredField)
                .count(),
            2
        );
    }

    #[test]
    fn test_duplicate_names_are_reported() {
        let loader = MemoryLoader::new()
            .with_document("root.md", doc("root", &["one", "two"]))
            .with_document("one.md", doc("same", &[]))
            .with_document("two.md", doc("same", &[]));
        let closure = SkillResolver::uncached(loader)
            .resolve("root", &options())
            .unwrap();
        let dupes: Vec<_> = closure
            .validation
            .errors_with(IssueCode::DuplicateSkillName)
            .collect();
        assert_eq!(dupes.len(), 1);
        assert!(dupes[0].message.contains("'one' and 'two'"));
    }

    #[test]
    fn test_missing_include_is_error_and_missing_context_is_warning() {
        let loader = MemoryLoader::new().with_document(
            "guide/SKILL.md",
            "---\nname: guide\ndescription: g\ncontext: [./notes.md]\n---\ninclude:./gone.md\n",
        );
        let closure = SkillResolver::uncached(loader)
            .resolve("guide", &options())
            .unwrap();

        let missing: Vec<_> = closure
            .validation
            .errors_with(IssueCode::IncludeNotFound)
            .collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].line, Some(6));
        assert!(closure.validation.has_warning(IssueCode::ContextNotFound));
        assert!(closure.resources.is_empty());
    }

    #[test]
    fn test_templates_are_leaf_resources() {
        let loader = MemoryLoader::new()
            .with_document(
                "page/SKILL.md",
                "---\nname: page\ndescription: p\n---\nStart from template:./layout.md\nthen template:./nope/missing.md\n",
            )
            .with_resource("page/layout.md");
        let closure = SkillResolver::uncached(loader)
            .resolve("page", &options())
            .unwrap();

        let found: Vec<_> = closure.resources_of(ResourceKind::Template).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, Path::new("page/layout.md"));
        assert_eq!((found[0].line, found[0].column), (Some(5), Some(12)));

        assert!(!closure.is_valid());
        let missing: Vec<_> = closure
            .validation
            .errors_with(IssueCode::TemplateNotFound)
            .collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].line, Some(6));
        assert!(missing[0].message.contains("./nope/missing.md"));
    }

    #[test]
    fn test_declared_structure_entries_are_checked() {
        let loader = MemoryLoader::new()
            .with_document(
                "deploy/SKILL.md",
                "---\nname: deploy\ndescription: d\nscripts: [./scripts]\ntypes: [./types]\n---\n",
            )
            .with_resource("deploy/scripts/run.sh");
        let resolver = SkillResolver::uncached(loader);
        let closure = resolver.resolve("deploy", &options()).unwrap();

        let scripts: Vec<_> = closure.resources_of(ResourceKind::Script).collect();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].path, Path::new("deploy/scripts"));
        assert!(closure.validation.has_warning(IssueCode::TypesNotFound));
        assert!(!closure.validation.has_warning(IssueCode::ScriptNotFound));
        assert!(closure.is_valid());

        let mut opts = options();
        opts.check_structure = false;
        let closure = resolver.resolve("deploy", &opts).unwrap();
        assert!(closure.validation.warnings.is_empty());
        assert!(closure.resources_of(ResourceKind::Script).next().is_none());
    }

    #[test]
    fn test_edge_kinds_can_be_disabled() {
        let loader = Arc::new(
            MemoryLoader::new()
                .with_document(
                    "root.md",
                    "---\nname: root\ndescription: r\ndependencies: [dep]\n---\ninclude:./gone.md load:./ctx.md\n",
                )
                .with_document("dep.md", doc("dep", &[])),
        );
        let resolver = SkillResolver::uncached(loader.clone());
        let mut opts = options();
        opts.resolve_skills = false;
        opts.resolve_includes = false;
        opts.resolve_context = false;
        opts.resolve_templates = false;

        let closure = resolver.resolve("root", &opts).unwrap();
        assert_eq!(closure.order, vec!["root"]);
        assert!(closure.is_valid());
        assert!(closure.validation.warnings.is_empty());
        assert_eq!(loader.load_count(), 1);
    }

    #[test]
    fn test_repeated_resolution_is_deterministic() {
        let resolver = SkillResolver::uncached(api_design_loader());
        let first = resolver.resolve("api-design", &options()).unwrap();
        let second = resolver.resolve("api-design", &options()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.skill("api-design").unwrap().references,
            second.skill("api-design").unwrap().references
        );
    }

    #[test]
    fn test_cache_serves_second_resolution() {
        let loader = api_design_loader();
        let cache = Arc::new(MemoryCache::new());
        let resolver = SkillResolver::new(loader.clone(), cache.clone());

        let first = resolver.resolve("api-design", &options()).unwrap();
        assert_eq!(loader.load_count(), 2);
        assert_eq!(cache.len(), 2);

        let second = resolver.resolve("api-design", &options()).unwrap();
        assert_eq!(loader.load_count(), 2);
        assert_eq!(first.order, second.order);
    }

    #[test]
    fn test_disabled_cache_is_bypassed() {
        let loader = api_design_loader();
        let cache = Arc::new(MemoryCache::new());
        let resolver = SkillResolver::new(loader.clone(), cache.clone());
        let mut opts = options();
        opts.cache = false;

        resolver.resolve("api-design", &opts).unwrap();
        resolver.resolve("api-design", &opts).unwrap();
        assert!(cache.is_empty());
        assert_eq!(loader.load_count(), 4);
    }

    #[test]
    fn test_skills_can_opt_out_of_caching() {
        let loader = MemoryLoader::new().with_document(
            "volatile.md",
            "---\nname: volatile\ndescription: v\nperformance:\n  cache: false\n---\n",
        );
        let cache = Arc::new(MemoryCache::new());
        let resolver = SkillResolver::new(loader, cache.clone());
        resolver.resolve("volatile", &options()).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_changed_document_invalidates_cached_copy() {
        let loader = Arc::new(MemoryLoader::new().with_document("a.md", doc("a", &[])));
        let cache = Arc::new(MemoryCache::new());
        let resolver = SkillResolver::new(loader.clone(), cache.clone());

        resolver.resolve("a", &options()).unwrap();
        loader.set_document("a.md", "---\nname: a\ndescription: rewritten\n---\n");

        let closure = resolver.resolve("a", &options()).unwrap();
        assert_eq!(
            closure.skill("a").unwrap().frontmatter.description,
            "rewritten"
        );
        assert_eq!(loader.load_count(), 2);
        assert_eq!(
            cache.get("a").unwrap().frontmatter.description,
            "rewritten"
        );
    }

    #[test]
    fn test_concurrent_resolutions_share_cache() {
        let loader = Arc::new(
            MemoryLoader::new()
                .with_document("root.md", doc("root", &["left", "right"]))
                .with_document("left.md", doc("left", &["shared"]))
                .with_document("right.md", doc("right", &["shared"]))
                .with_document("shared.md", doc("shared", &[])),
        );
        let cache = Arc::new(MemoryCache::new());
        let resolver = SkillResolver::new(loader, cache.clone());

        std::thread::scope(|scope| {
            let handles: Vec<_> = ["root", "left", "right", "root"]
                .into_iter()
                .map(|root| {
                    let resolver = &resolver;
                    scope.spawn(move || resolver.resolve(root, &options()).unwrap())
                })
                .collect();
            for handle in handles {
                let closure = handle.join().unwrap();
                assert!(closure.is_valid());
                assert_eq!(closure.order.last(), Some(&closure.root));
            }
        });
        assert_eq!(cache.len(), 4);
    }
}
