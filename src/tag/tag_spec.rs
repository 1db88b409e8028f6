use crate::args::Arg;
use crate::error::{Result, TagError};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};

static TAG_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// The declared arguments of one template tag
#[derive(Debug, Clone)]
pub struct TagSpec {
    name: String,
    block: bool,
    description: Option<String>,
    positional: Vec<Arg>,
    named: BTreeMap<String, Arg>,
}

impl TagSpec {
    pub fn builder<S: Into<String>>(name: S) -> TagSpecBuilder {
        TagSpecBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_block(&self) -> bool {
        self.block
    }

    /// Closing tag name for block tags
    pub fn end_tag_name(&self) -> Option<String> {
        self.block.then(|| format!("end{}", self.name))
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Positional arguments, in the order they are matched
    pub fn positional_args(&self) -> &[Arg] {
        &self.positional
    }

    /// Keyword arguments by keyword
    pub fn named_args(&self) -> &BTreeMap<String, Arg> {
        &self.named
    }

    pub fn named_arg(&self, keyword: &str) -> Option<&Arg> {
        self.named.get(keyword)
    }

    /// Every argument, positional ones first
    pub fn args(&self) -> impl Iterator<Item = &Arg> {
        self.positional.iter().chain(self.named.values())
    }

    /// Look up an argument by the name its value is stored under
    pub fn arg(&self, name: &str) -> Option<&Arg> {
        self.args().find(|arg| arg.name() == Some(name))
    }
}

/// Declares a tag's arguments and checks them as a whole in [`TagSpecBuilder::build`]
#[derive(Debug, Clone)]
pub struct TagSpecBuilder {
    name: String,
    block: bool,
    description: Option<String>,
    args: Vec<(String, Arg)>,
    parent: Option<TagSpec>,
}

impl TagSpecBuilder {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            block: false,
            description: None,
            args: Vec::new(),
            parent: None,
        }
    }

    /// Declare an argument under the attribute name `attr`.
    ///
    /// Trailing underscores are stripped to get the keyword, so `name_`
    /// declares the keyword `name`.
    pub fn arg<S: Into<String>>(mut self, attr: S, arg: Arg) -> Self {
        self.args.push((attr.into(), arg));
        self
    }

    pub fn block(mut self, block: bool) -> Self {
        self.block = block;
        self
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Inherit another tag's arguments: its positional arguments come first
    /// and its keyword arguments apply unless redeclared here
    pub fn extends(mut self, parent: &TagSpec) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    pub fn build(self) -> Result<TagSpec> {
        if !TAG_NAME_RE.is_match(&self.name) {
            return Err(TagError::configuration(format!(
                "'{}' is not a valid tag name",
                self.name
            )));
        }

        let mut positional = Vec::new();
        let mut named = BTreeMap::new();

        for (attr, mut arg) in self.args {
            let keyword = attr.trim_end_matches('_');
            arg.assign_keyword(keyword);
            if arg.is_positional() {
                if arg.name().is_none() {
                    return Err(TagError::configuration(format!(
                        "positional argument '{}' of '{}' needs a name",
                        attr, self.name
                    )));
                }
                positional.push(arg);
            } else {
                if keyword.is_empty() {
                    return Err(TagError::configuration(format!(
                        "keyword argument '{}' of '{}' needs a keyword",
                        attr, self.name
                    )));
                }
                if named.insert(keyword.to_string(), arg).is_some() {
                    return Err(TagError::configuration(format!(
                        "'{}' declares the keyword '{}' more than once",
                        self.name, keyword
                    )));
                }
            }
        }

        if let Some(parent) = self.parent {
            let mut inherited = parent.positional;
            inherited.extend(positional);
            positional = inherited;
            for (keyword, arg) in parent.named {
                named.entry(keyword).or_insert(arg);
            }
        }

        let mut optional_seen = false;
        for arg in &positional {
            if arg.is_required() {
                if optional_seen {
                    return Err(TagError::configuration(format!(
                        "Required '{}' positional argument of '{}' cannot exist after optional positional arguments.",
                        arg.display_name(),
                        self.name
                    )));
                }
            } else {
                optional_seen = true;
            }
        }

        let mut stored = HashSet::new();
        for arg in positional.iter().chain(named.values()) {
            if !stored.insert(arg.display_name().to_string()) {
                return Err(TagError::configuration(format!(
                    "'{}' stores more than one argument as '{}'",
                    self.name,
                    arg.display_name()
                )));
            }
        }

        debug!(
            "Defined tag '{}' with {} positional and {} keyword arguments",
            self.name,
            positional.len(),
            named.len()
        );

        Ok(TagSpec {
            name: self.name,
            block: self.block,
            description: self.description,
            positional,
            named,
        })
    }
}
