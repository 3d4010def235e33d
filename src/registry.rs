//! Node-type registry.
//!
//! Node types are an open set: the platform and its community packages add
//! new ones all the time. The registry is a lookup table keyed by type name;
//! a type missing from it is reported as unknown rather than rejected.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const BASE_PREFIX: &str = "n8n-nodes-base.";
const LANGCHAIN_PREFIX: &str = "@n8n/n8n-nodes-langchain.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Trigger,
    Action,
    Transform,
    Datastore,
    ChatModel,
    /// Canvas decorations such as sticky notes; never wired into the graph.
    Annotation,
}

/// A parameter the node must declare. Satisfied by the parameter itself or any
/// of its alternatives. Parameters with a platform default are never missing,
/// since exports omit default-valued parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ParamRuleDef")]
pub struct ParamRule {
    pub name: String,
    pub alternatives: Vec<String>,
    pub default: Option<Value>,
}

impl ParamRule {
    pub fn required(name: &str) -> Self {
        ParamRule {
            name: name.into(),
            alternatives: vec![],
            default: None,
        }
    }

    pub fn defaulted(name: &str, default: Value) -> Self {
        ParamRule {
            name: name.into(),
            alternatives: vec![],
            default: Some(default),
        }
    }

    pub fn or(mut self, alternative: &str) -> Self {
        self.alternatives.push(alternative.into());
        self
    }

    /// All parameter names that satisfy this rule.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.alternatives.iter().map(String::as_str))
    }
}

/// Config files may name a required parameter with a bare string.
#[derive(Deserialize)]
#[serde(untagged)]
enum ParamRuleDef {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        alternatives: Vec<String>,
        #[serde(default)]
        default: Option<Value>,
    },
}

impl From<ParamRuleDef> for ParamRule {
    fn from(def: ParamRuleDef) -> Self {
        match def {
            ParamRuleDef::Name(name) => ParamRule::required(&name),
            ParamRuleDef::Full {
                name,
                alternatives,
                default,
            } => ParamRule {
                name,
                alternatives,
                default,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeprecatedParam {
    pub name: String,
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTypeSpec {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub required: Vec<ParamRule>,
    #[serde(default)]
    pub deprecated_params: Vec<DeprecatedParam>,
    /// Credential types, any one of which the node should reference.
    #[serde(default)]
    pub credentials: Vec<String>,
    /// Replacement type when this node type itself is deprecated.
    #[serde(default)]
    pub deprecated_by: Option<String>,
}

impl NodeTypeSpec {
    pub fn new(name: &str, kind: NodeKind) -> Self {
        NodeTypeSpec {
            name: name.into(),
            kind,
            aliases: vec![],
            required: vec![],
            deprecated_params: vec![],
            credentials: vec![],
            deprecated_by: None,
        }
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn param(mut self, rule: ParamRule) -> Self {
        self.required.push(rule);
        self
    }

    pub fn deprecated_param(mut self, name: &str, hint: &str) -> Self {
        self.deprecated_params.push(DeprecatedParam {
            name: name.into(),
            hint: hint.into(),
        });
        self
    }

    pub fn credential(mut self, kind: &str) -> Self {
        self.credentials.push(kind.into());
        self
    }

    pub fn deprecated_by(mut self, replacement: &str) -> Self {
        self.deprecated_by = Some(replacement.into());
        self
    }

    pub fn is_trigger(&self) -> bool {
        self.kind == NodeKind::Trigger
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeTypeRegistry {
    types: HashMap<String, NodeTypeSpec>,
    aliases: HashMap<String, String>,
}

impl NodeTypeRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the platform's common node types.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for spec in builtin_specs() {
            registry.register(spec);
        }
        registry
    }

    /// Add a node type, replacing any existing entry with the same name.
    pub fn register(&mut self, spec: NodeTypeSpec) {
        for alias in &spec.aliases {
            self.aliases.insert(alias.clone(), spec.name.clone());
        }
        self.types.insert(spec.name.clone(), spec);
    }

    /// Look up a type by exact name, then alias, then as a bare name inside
    /// the core node package.
    pub fn lookup(&self, type_name: &str) -> Option<&NodeTypeSpec> {
        if let Some(spec) = self.types.get(type_name) {
            return Some(spec);
        }
        if let Some(spec) = self.aliases.get(type_name).and_then(|n| self.types.get(n)) {
            return Some(spec);
        }
        if !type_name.contains('.') {
            return self.types.get(&format!("{BASE_PREFIX}{type_name}"));
        }
        None
    }

    pub fn kind_of(&self, type_name: &str) -> Option<NodeKind> {
        self.lookup(type_name).map(|spec| spec.kind)
    }

    /// Registered trigger types, plus unregistered types whose name ends in
    /// `Trigger` (community and newer core triggers follow that convention).
    pub fn is_trigger(&self, type_name: &str) -> bool {
        match self.kind_of(type_name) {
            Some(kind) => kind == NodeKind::Trigger,
            None => has_trigger_suffix(type_name),
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn has_trigger_suffix(type_name: &str) -> bool {
    type_name
        .rsplit('.')
        .next()
        .is_some_and(|bare| bare.len() > "Trigger".len() && bare.ends_with("Trigger"))
}

fn base(name: &str, kind: NodeKind) -> NodeTypeSpec {
    NodeTypeSpec::new(&format!("{BASE_PREFIX}{name}"), kind)
}

fn langchain(name: &str, kind: NodeKind) -> NodeTypeSpec {
    NodeTypeSpec::new(&format!("{LANGCHAIN_PREFIX}{name}"), kind)
}

fn builtin_specs() -> Vec<NodeTypeSpec> {
    use NodeKind::*;

    vec![
        // Triggers
        base("webhook", Trigger)
            .param(ParamRule::defaulted("httpMethod", json!("GET")))
            .param(ParamRule::defaulted("path", json!(""))),
        base("scheduleTrigger", Trigger)
            .param(ParamRule::defaulted("rule", json!({"interval": [{}]}))),
        base("cron", Trigger)
            .param(ParamRule::defaulted("triggerTimes", json!({})))
            .deprecated_by("n8n-nodes-base.scheduleTrigger"),
        base("manualTrigger", Trigger),
        base("start", Trigger).deprecated_by("n8n-nodes-base.manualTrigger"),
        base("formTrigger", Trigger).param(ParamRule::required("formTitle")),
        base("executeWorkflowTrigger", Trigger),
        base("errorTrigger", Trigger),
        base("emailReadImap", Trigger).credential("imap"),
        base("telegramTrigger", Trigger)
            .param(ParamRule::required("updates"))
            .credential("telegramApi"),
        base("interval", Trigger).deprecated_by("n8n-nodes-base.scheduleTrigger"),
        base("n8nTrigger", Trigger),
        base("localFileTrigger", Trigger).param(ParamRule::required("path")),
        base("rssFeedReadTrigger", Trigger).param(ParamRule::required("feedUrl")),
        base("gmailTrigger", Trigger).credential("gmailOAuth2"),
        base("googleSheetsTrigger", Trigger)
            .param(ParamRule::required("documentId"))
            .credential("googleSheetsTriggerOAuth2Api"),
        base("googleDriveTrigger", Trigger).credential("googleDriveOAuth2Api"),
        base("googleCalendarTrigger", Trigger).credential("googleCalendarOAuth2Api"),
        base("slackTrigger", Trigger).credential("slackApi"),
        base("githubTrigger", Trigger)
            .param(ParamRule::required("owner"))
            .param(ParamRule::required("repository"))
            .credential("githubApi")
            .credential("githubOAuth2Api"),
        base("airtableTrigger", Trigger).credential("airtableTokenApi"),
        base("notionTrigger", Trigger).credential("notionApi"),
        base("stripeTrigger", Trigger).credential("stripeApi"),
        base("typeformTrigger", Trigger).credential("typeformApi"),
        base("postgresTrigger", Trigger).credential("postgres"),
        base("whatsAppTrigger", Trigger).credential("whatsAppTriggerApi"),
        base("discordTrigger", Trigger),
        langchain("chatTrigger", Trigger),
        langchain("manualChatTrigger", Trigger),
        langchain("mcpTrigger", Trigger),
        // Actions
        base("httpRequest", Action)
            .param(ParamRule::required("url"))
            .deprecated_param("jsonParameters", "use 'sendBody' with 'specifyBody' instead")
            .deprecated_param("bodyParametersJson", "use 'jsonBody' instead")
            .deprecated_param("headerParametersJson", "use 'jsonHeaders' instead"),
        base("emailSend", Action)
            .param(ParamRule::required("toEmail"))
            .param(ParamRule::required("fromEmail"))
            .credential("smtp"),
        base("slack", Action)
            .credential("slackApi")
            .credential("slackOAuth2Api"),
        base("telegram", Action)
            .param(ParamRule::required("chatId"))
            .credential("telegramApi"),
        base("executeWorkflow", Action)
            .param(ParamRule::required("workflowId").or("workflowPath")),
        base("wait", Action),
        // Transforms
        base("set", Transform),
        base("code", Transform).param(ParamRule::defaulted("jsCode", json!("")).or("pythonCode")),
        base("function", Transform)
            .param(ParamRule::required("functionCode"))
            .deprecated_by("n8n-nodes-base.code"),
        base("functionItem", Transform)
            .param(ParamRule::required("functionCode"))
            .deprecated_by("n8n-nodes-base.code"),
        base("if", Transform).param(ParamRule::defaulted("conditions", json!({}))),
        base("switch", Transform),
        base("merge", Transform),
        base("noOp", Transform),
        base("filter", Transform),
        base("aggregate", Transform),
        base("splitInBatches", Transform),
        base("itemLists", Transform),
        base("moveBinaryData", Transform),
        base("spreadsheetFile", Transform),
        // Datastores
        base("googleSheets", Datastore)
            .param(ParamRule::required("documentId").or("sheetId"))
            .param(ParamRule::required("sheetName").or("range"))
            .credential("googleSheetsOAuth2Api")
            .credential("googleApi"),
        base("airtable", Datastore)
            .param(ParamRule::required("base").or("application"))
            .param(ParamRule::required("table"))
            .credential("airtableTokenApi")
            .credential("airtableApi"),
        base("postgres", Datastore)
            .param(ParamRule::required("table").or("query"))
            .credential("postgres"),
        base("notion", Datastore).credential("notionApi"),
        NodeTypeSpec::new("append-row", Datastore),
        // AI
        base("openAi", ChatModel).credential("openAiApi"),
        langchain("lmChatOpenAi", ChatModel).credential("openAiApi"),
        langchain("lmChatAnthropic", ChatModel).credential("anthropicApi"),
        langchain("lmChatGoogleGemini", ChatModel).credential("googlePalmApi"),
        langchain("agent", ChatModel),
        langchain("chainLlm", ChatModel),
        NodeTypeSpec::new("chat-model", ChatModel),
        // Canvas
        base("stickyNote", Annotation),
    ]
}
