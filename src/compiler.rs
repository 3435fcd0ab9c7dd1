//! Analyze, optimize and generate, one handler at a time.

use anyhow::{Context, Result, bail};
use hfx_ast::{AnalysisResult, EventModifiers, Node, NodeRef, analyze};
use hfx_emitter::{
    BasicStatementCodegen, BindingTarget, CodegenContext, EventHandlerCodegen, GeneratedHandler,
    HandlerBinding, StatementCodegen, generate_initialization, runtime,
};
use hfx_optimizer::Optimizer;
use serde::{Deserialize, Serialize};

use crate::config::CompilerOptions;

/// One handler to compile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HandlerInput {
    /// An `event` node.
    pub node: NodeRef,
    /// Derived locally when absent.
    #[serde(default)]
    pub analysis: Option<AnalysisResult>,
    /// Bind to every element matching this selector at DOM-ready.
    #[serde(default)]
    pub selector: Option<String>,
}

/// A compilation unit: handlers that share helper registrations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleInput {
    pub handlers: Vec<HandlerInput>,
}

impl ModuleInput {
    /// Accepts `{"handlers": [...]}` or a single event node.
    ///
    /// The document shape is picked by the presence of `handlers`, so decode
    /// errors name the offending field.
    pub fn from_json(source: &str) -> Result<Self> {
        let document: serde_json::Value =
            serde_json::from_str(source).context("input is not valid JSON")?;
        if document.get("handlers").is_some() {
            return serde_json::from_value(document).context("invalid `handlers` document");
        }
        let node: NodeRef = serde_json::from_value(document).context("invalid event node")?;
        Ok(ModuleInput {
            handlers: vec![HandlerInput {
                node,
                analysis: None,
                selector: None,
            }],
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledHandler {
    pub handler_id: String,
    pub event: String,
    /// Passes that ran, in order.
    pub optimizations: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(skip)]
    pub modifiers: EventModifiers,
    #[serde(flatten)]
    pub generated: GeneratedHandler,
}

impl CompiledHandler {
    pub fn function_name(&self) -> String {
        runtime::handler_function_name(&self.handler_id)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledModule {
    pub handlers: Vec<CompiledHandler>,
    /// Every runtime helper any handler imports, first occurrence first.
    pub imports: Vec<String>,
}

impl CompiledModule {
    /// `_rt.ready(...)` block binding the selector-keyed handlers.
    pub fn initialization(&self) -> Option<String> {
        let bindings: Vec<HandlerBinding> = self
            .handlers
            .iter()
            .filter_map(|handler| {
                let selector = handler.selector.as_ref()?;
                Some(HandlerBinding {
                    target: BindingTarget::Selector(selector.clone()),
                    event: handler.event.clone(),
                    handler_name: handler.function_name(),
                    modifiers: handler.modifiers.clone(),
                })
            })
            .collect();
        if bindings.is_empty() {
            None
        } else {
            Some(generate_initialization(&bindings))
        }
    }

    /// Handler functions followed by the initialization block.
    ///
    /// Handlers without a selector are not bound here. Their `binding_code`
    /// attaches to the ambient `_el`, which only exists where the caller
    /// splices it in.
    pub fn to_javascript(&self) -> String {
        let mut sections: Vec<String> = self
            .handlers
            .iter()
            .map(|handler| handler.generated.handler_code.clone())
            .collect();
        sections.extend(self.initialization());
        let mut out = sections.join("\n\n");
        out.push('\n');
        out
    }
}

pub struct Compiler {
    optimizer: Optimizer,
    options: CompilerOptions,
    statements: Box<dyn StatementCodegen>,
    next_handler: usize,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        let mut optimizer = Optimizer::new();
        let known = optimizer.pass_names();
        for name in &options.disabled_passes {
            if !known.iter().any(|pass| *pass == name.as_str()) {
                tracing::warn!(pass = %name, "[compiler] disabling unknown pass");
            }
            optimizer.disable_pass(name.as_str());
        }
        Compiler {
            optimizer,
            options,
            statements: Box::new(BasicStatementCodegen),
            next_handler: 0,
        }
    }

    /// Swap in a different statement generator.
    pub fn with_statements(mut self, statements: Box<dyn StatementCodegen>) -> Self {
        self.statements = statements;
        self
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    fn next_handler_id(&mut self) -> String {
        self.next_handler += 1;
        format!("{}{}", self.options.handler_id_prefix, self.next_handler)
    }

    /// Compile one handler into `ctx`, consuming the next handler id.
    pub fn compile_handler(
        &mut self,
        input: &HandlerInput,
        ctx: &mut CodegenContext,
    ) -> Result<CompiledHandler> {
        let Node::Event(event) = input.node.as_ref() else {
            bail!(
                "expected an `event` node at the top level, found `{}`",
                input.node.kind()
            );
        };

        let handler_id = self.next_handler_id();
        let span = tracing::info_span!(
            "compile_handler",
            event = %event.event,
            handler_id = %handler_id
        );
        let _guard = span.enter();

        let analysis = match &input.analysis {
            Some(analysis) => analysis.clone(),
            None => analyze(&input.node),
        };
        let optimized =
            self.optimizer
                .optimize(&input.node, &analysis, self.options.optimization_level);

        // Passes never change the root kind.
        let Node::Event(event) = optimized.ast.as_ref() else {
            bail!("optimizer replaced the event node");
        };

        ctx.set_handler_id(handler_id.as_str());
        let generated = EventHandlerCodegen::new(self.statements.as_ref())
            .generate(event, ctx, &analysis);

        Ok(CompiledHandler {
            handler_id,
            event: event.event.clone(),
            optimizations: optimized.optimizations,
            selector: input.selector.clone(),
            modifiers: event.modifiers.clone(),
            generated,
        })
    }

    /// Compile every handler of `module` against one shared context.
    pub fn compile_module(&mut self, module: &ModuleInput) -> Result<CompiledModule> {
        let mut ctx = CodegenContext::new(self.options.handler_id_prefix.as_str());
        let mut handlers = Vec::with_capacity(module.handlers.len());
        for (index, input) in module.handlers.iter().enumerate() {
            let compiled = self
                .compile_handler(input, &mut ctx)
                .with_context(|| format!("handler #{index}"))?;
            handlers.push(compiled);
        }

        let mut imports: Vec<String> = Vec::new();
        for name in handlers.iter().flat_map(|h| h.generated.imports.iter()) {
            if !imports.contains(name) {
                imports.push(name.clone());
            }
        }
        tracing::info!(
            handlers = handlers.len(),
            imports = imports.len(),
            "[compiler] module compiled"
        );

        Ok(CompiledModule { handlers, imports })
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new(CompilerOptions::default())
    }
}
