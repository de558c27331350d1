mod execution;

use crate::application::tooling::{ServerToolInfo, ToolServerInterface};
use crate::types::ToolSpec;
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) use super::ToolError;

/// The discovered tool set together with the session that executes it.
pub(crate) struct ToolRuntime {
    tools: Vec<ServerToolInfo>,
    index: HashMap<String, usize>,
    bridge: Arc<dyn ToolServerInterface>,
}

impl ToolRuntime {
    pub(crate) fn new(tools: Vec<ServerToolInfo>, bridge: Arc<dyn ToolServerInterface>) -> Self {
        let index = tools
            .iter()
            .enumerate()
            .map(|(position, tool)| (tool.name.clone(), position))
            .collect();
        Self {
            tools,
            index,
            bridge,
        }
    }

    pub(crate) fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(ServerToolInfo::to_spec).collect()
    }

    pub(crate) fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name.as_str()).collect()
    }

    fn lookup(&self, name: &str) -> Option<&ServerToolInfo> {
        self.index.get(name).map(|&position| &self.tools[position])
    }
}
