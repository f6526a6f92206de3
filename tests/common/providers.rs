//! Test doubles for the executor, model and codec boundaries.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use yang_path::error::{CodecError, CodecErrorCode};
use yang_path::providers::ModelFormat;
use yang_path::schema::NodeKind;
use yang_path::{
    CodecService, DataNodeId, DataTree, EncodingFormat, ModelProvider, RootSchemaNode, Rpc,
    ServiceProvider, YangError, YangResult,
};

/// Executor answering every operation locally.
///
/// Operations with output get `status` set to `ok`, or `failed` when the
/// input `name` is `fail`. An input `name` of `offline` makes the executor
/// itself fail. Invoked operation paths are recorded.
pub struct LoopbackExecutor {
    schema: Arc<RootSchemaNode>,
    pub invoked: RefCell<Vec<String>>,
}

impl LoopbackExecutor {
    pub fn new(schema: Arc<RootSchemaNode>) -> Self {
        Self {
            schema,
            invoked: RefCell::new(Vec::new()),
        }
    }
}

impl ServiceProvider for LoopbackExecutor {
    fn root_schema(&self) -> Arc<RootSchemaNode> {
        Arc::clone(&self.schema)
    }

    fn invoke(&self, rpc: &Rpc) -> YangResult<Option<DataTree>> {
        let data = rpc.data();
        let path = data.path(rpc.node());
        self.invoked.borrow_mut().push(path.clone());
        if !rpc.has_output() {
            return Ok(None);
        }

        let names: Vec<&str> = rpc
            .input()
            .map(|input| data.find(input, "name"))
            .transpose()?
            .unwrap_or_default()
            .into_iter()
            .map(|n| data.get(n))
            .collect();
        if names.contains(&"offline") {
            return Err(YangError::Provider(Box::new(io::Error::new(
                io::ErrorKind::NotConnected,
                "device offline",
            ))));
        }
        let failed = names.contains(&"fail");

        let mut output = DataTree::new(Arc::clone(&self.schema));
        let root = output.root();
        let status = if failed { "failed" } else { "ok" };
        output.create(root, &format!("{path}/output/status"), status)?;
        Ok(Some(output))
    }
}

/// Model provider serving definitions from memory and counting requests.
#[derive(Default)]
pub struct StaticModelProvider {
    models: HashMap<String, String>,
    pub requests: Cell<usize>,
}

impl StaticModelProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, module: &str, json: &str) -> Self {
        self.models.insert(module.to_string(), json.to_string());
        self
    }
}

impl ModelProvider for StaticModelProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn get_model(
        &self,
        module: &str,
        _revision: &str,
        format: ModelFormat,
    ) -> YangResult<Option<String>> {
        self.requests.set(self.requests.get() + 1);
        if format != ModelFormat::Json {
            return Ok(None);
        }
        Ok(self.models.get(module).cloned())
    }
}

/// Line-based codec: one `path<TAB>value` line per node holding a value and
/// one bare path line per empty container. Only the JSON format is offered.
pub struct LineCodec;

impl LineCodec {
    fn check_format(format: EncodingFormat) -> Result<(), CodecError> {
        match format {
            EncodingFormat::Json => Ok(()),
            EncodingFormat::Xml => Err(CodecError::new(
                CodecErrorCode::InvalidMarkup,
                "XML is not supported by the line codec",
            )),
        }
    }
}

impl CodecService for LineCodec {
    fn encode(
        &self,
        tree: &DataTree,
        node: DataNodeId,
        format: EncodingFormat,
        pretty: bool,
    ) -> Result<String, CodecError> {
        Self::check_format(format)?;
        let mut lines = Vec::new();
        for id in tree.descendants(node) {
            if id == tree.root() {
                continue;
            }
            let kind = tree.schema(id).kind();
            let path = tree.path(id);
            if kind.holds_value() {
                lines.push(format!("{path}\t{}", tree.get(id)));
            } else if tree.children(id).is_empty() && kind != NodeKind::List {
                lines.push(path);
            }
        }
        let separator = if pretty { "\n" } else { "\r\n" };
        Ok(lines.join(separator))
    }

    fn decode(
        &self,
        schema: Arc<RootSchemaNode>,
        payload: &str,
        format: EncodingFormat,
    ) -> Result<DataTree, CodecError> {
        Self::check_format(format)?;
        let mut tree = DataTree::new(schema);
        let root = tree.root();
        for line in payload.lines().filter(|l| !l.is_empty()) {
            let created = match line.split_once('\t') {
                Some((path, value)) => tree.create(root, path, value),
                None => tree.create_path(root, line),
            };
            created.map_err(|e| CodecError::new(CodecErrorCode::InvalidMarkup, e.to_string()))?;
        }
        Ok(tree)
    }
}
