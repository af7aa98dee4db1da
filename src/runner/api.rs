//! The presenter: public entry points of the generation core.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, debug_span, error, trace, warn};

use crate::runner::algo::ancestors::collect_context;
use crate::runner::ds::accessible::AccessibleRef;
use crate::runner::ds::context::{Context, FormatMode, OutputChannel, PointOfReference};
use crate::runner::ds::element::ElementList;
use crate::runner::ds::error::{EvaluationError, GenerationError, GeneratorResult};
use crate::runner::ds::role::Role;
use crate::runner::eval::{DemandEvaluator, NameResolver};
use crate::runner::format::registry::{FormatEntry, FormatRegistry};
use crate::runner::format::report::ValidationReport;
use crate::runner::format::table::FormatTable;
use crate::runner::plugin::config::{Profile, Settings};
use crate::runner::plugin::registry::GeneratorRegistry;
use crate::runner::script::{DefaultScript, Script};

/// Options for [`Presenter::generate_with`].
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub mode: FormatMode,
    pub role_override: Option<Role>,
    /// The previously presented object; context is limited to what changed.
    pub prior_object: Option<AccessibleRef>,
    /// Evaluate the mode's prefix and suffix around the role format.
    pub include_context: bool,
    pub already_focused: bool,
}

impl GenerateOptions {
    pub fn new(mode: FormatMode) -> Self {
        GenerateOptions {
            mode,
            role_override: None,
            prior_object: None,
            include_context: true,
            already_focused: false,
        }
    }

    pub fn with_role(mut self, role: Option<Role>) -> Self {
        self.role_override = role;
        self
    }

    pub fn with_prior_object(mut self, prior: &AccessibleRef) -> Self {
        self.prior_object = Some(prior.clone());
        self
    }

    pub fn without_context(mut self) -> Self {
        self.include_context = false;
        self
    }

    pub fn already_focused(mut self, already_focused: bool) -> Self {
        self.already_focused = already_focused;
        self
    }
}

/// Turns accessible objects into element lists for one output channel.
///
/// Holds the compiled format registry and the frozen generator table for a
/// profile, plus the session point of reference.
pub struct Presenter {
    channel: OutputChannel,
    formats: FormatRegistry,
    generators: GeneratorRegistry,
    script: Rc<dyn Script>,
    settings: Settings,
    report: ValidationReport,
    point_of_reference: RefCell<PointOfReference>,
}

impl Presenter {
    /// Compile `table` and dry-run it against `generators`.
    pub fn new(
        channel: OutputChannel,
        table: &FormatTable,
        generators: GeneratorRegistry,
        script: Rc<dyn Script>,
        settings: Settings,
    ) -> Self {
        let formats = FormatRegistry::load(channel, table);
        let report = formats.validate(|name| generators.has(name));
        if !report.is_clean() {
            warn!(
                diagnostics = report.diagnostics().len(),
                "format tables loaded with problems"
            );
        }
        Presenter {
            channel,
            formats,
            generators,
            script,
            settings,
            report,
            point_of_reference: RefCell::new(PointOfReference::new()),
        }
    }

    pub fn from_profile(
        channel: OutputChannel,
        profile: &Profile,
        generators: GeneratorRegistry,
        script: Rc<dyn Script>,
    ) -> Self {
        Self::new(
            channel,
            &profile.format_table(channel),
            generators,
            script,
            profile.settings.clone(),
        )
    }

    /// Built-in tables, core generators and the stock script.
    pub fn with_defaults(channel: OutputChannel) -> Self {
        Self::from_profile(
            channel,
            &Profile::new(),
            GeneratorRegistry::with_core(),
            Rc::new(DefaultScript),
        )
    }

    pub fn channel(&self) -> OutputChannel {
        self.channel
    }

    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    pub fn generators(&self) -> &GeneratorRegistry {
        &self.generators
    }

    pub fn script(&self) -> &dyn Script {
        self.script.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Diagnostics from loading and dry-running the format tables.
    pub fn validation_report(&self) -> &ValidationReport {
        &self.report
    }

    /// A copy of the session point of reference.
    pub fn point_of_reference(&self) -> PointOfReference {
        self.point_of_reference.borrow().clone()
    }

    pub fn reset_point_of_reference(&self) {
        *self.point_of_reference.borrow_mut() = PointOfReference::new();
    }

    /// Present `obj` in `mode`, optionally as if it had `role_override`.
    ///
    /// Never fails: problems are logged and yield an empty or partial list.
    pub fn generate(
        &self,
        obj: &AccessibleRef,
        mode: FormatMode,
        role_override: Option<Role>,
    ) -> ElementList {
        self.generate_with(obj, GenerateOptions::new(mode).with_role(role_override))
    }

    pub fn generate_with(&self, obj: &AccessibleRef, options: GenerateOptions) -> ElementList {
        let span = debug_span!("generate", object = %obj.id(), mode = %options.mode);
        let _entered = span.enter();

        let mut ctx = self
            .new_context(options.mode)
            .with_prior_object(options.prior_object);
        ctx.include_context = options.include_context;
        ctx.already_focused = options.already_focused;

        let previous = options.role_override.map(|role| ctx.override_role(role));
        let result = self.run(obj, &mut ctx, true);
        if let Some(previous) = previous {
            ctx.restore_role(previous);
        }

        match result {
            Ok(elements) => {
                let pending = ctx.take_pending();
                if !pending.is_empty() {
                    self.point_of_reference.borrow_mut().apply(pending);
                }
                elements
            }
            Err(e) => {
                log_contained(&e);
                ElementList::new()
            }
        }
    }

    /// Generate `obj` from inside a generator, sharing the caller's context.
    ///
    /// A failure here empties only this contribution and drops any point of
    /// reference updates it staged.
    pub fn generate_nested(&self, obj: &AccessibleRef, ctx: &mut Context) -> ElementList {
        let checkpoint = ctx.checkpoint();
        match self.run(obj, ctx, false) {
            Ok(elements) => elements,
            Err(e) => {
                ctx.rollback(checkpoint);
                log_contained(&e);
                ElementList::new()
            }
        }
    }

    /// Breadcrumb of the containers between `obj` and `stop_ancestor`.
    pub fn generate_context(
        &self,
        obj: &AccessibleRef,
        stop_ancestor: Option<&AccessibleRef>,
    ) -> ElementList {
        match collect_context(self, obj, stop_ancestor) {
            Ok(elements) => elements,
            Err(e) => {
                debug!(object = %obj.id(), error = %e, "context collection abandoned");
                ElementList::new()
            }
        }
    }

    fn new_context(&self, mode: FormatMode) -> Context {
        Context::new(mode, self.channel)
            .with_point_of_reference(self.point_of_reference.borrow().clone())
            .with_max_depth(self.settings.max_generation_depth)
    }

    fn run(
        &self,
        obj: &AccessibleRef,
        ctx: &mut Context,
        outermost: bool,
    ) -> Result<ElementList, GenerationError> {
        let role = match ctx.enter(obj) {
            Ok(role) => role,
            Err(e) => {
                if let GenerationError::Evaluation(cause) = &e {
                    error!(object = %obj.id(), error = %cause, "generation refused");
                }
                return Err(e);
            }
        };
        let result = self.render(obj, role, ctx, outermost);
        ctx.leave();
        result
    }

    fn render(
        &self,
        obj: &AccessibleRef,
        role: Role,
        ctx: &mut Context,
        outermost: bool,
    ) -> Result<ElementList, GenerationError> {
        let mode = ctx.format_mode;
        let with_context = outermost && ctx.include_context;
        let mut out = ElementList::new();

        if with_context {
            if let Some(prefix) = self.formats.prefix(mode) {
                out.extend(self.evaluate_entry(prefix, obj, role, ctx)?);
            }
        }
        match self.formats.lookup(role, mode) {
            Some(entry) => out.extend(self.evaluate_entry(entry, obj, role, ctx)?),
            None => debug!(role = %role, mode = %mode, "no format entry"),
        }
        if with_context {
            if let Some(suffix) = self.formats.suffix(mode) {
                out.extend(self.evaluate_entry(suffix, obj, role, ctx)?);
            }
        }
        Ok(out)
    }

    fn evaluate_entry(
        &self,
        entry: &FormatEntry,
        obj: &AccessibleRef,
        role: Role,
        ctx: &mut Context,
    ) -> Result<ElementList, EvaluationError> {
        let result = match entry.expr() {
            Ok(expr) => {
                let mut resolver = GeneratorResolver {
                    presenter: self,
                    obj,
                    ctx,
                };
                DemandEvaluator::new(expr)
                    .run(&mut resolver)
                    .map(|evaluation| evaluation.elements)
            }
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            error!(
                role = %role,
                expression = %entry.source,
                location = %entry.location,
                error = %e,
                "format evaluation failed"
            );
        }
        result
    }
}

fn log_contained(e: &GenerationError) {
    match e {
        GenerationError::Access(access) => debug!(error = %access, "object unavailable"),
        GenerationError::UnknownGenerator(name) => warn!(generator = %name, "unknown generator"),
        // Already logged with the role and expression where it happened.
        GenerationError::Evaluation(_) => {}
    }
}

struct GeneratorResolver<'a> {
    presenter: &'a Presenter,
    obj: &'a AccessibleRef,
    ctx: &'a mut Context,
}

impl NameResolver for GeneratorResolver<'_> {
    fn resolve(&mut self, name: &str) -> Option<GeneratorResult> {
        let binding = self.presenter.generators.get(name)?;
        let start = Instant::now();
        let result = binding.func.call(self.presenter, self.obj, self.ctx);
        trace!(
            generator = name,
            source = %binding.source,
            elapsed_us = start.elapsed().as_micros() as u64,
            "generator finished"
        );
        Some(result)
    }
}
