//! 평탄화된 설정 트리와 섹션 바인딩.
//!
//! JSON 객체는 `.`으로 이어진 키로 펼쳐지고, 값은 모두 문자열로 보관된다.
//! 키 조회는 ASCII 대소문자를 구분하지 않지만 원본 표기는 그대로 유지한다.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::binder::{self, Node};
use crate::error::StartupError;

/// 섹션 경로 구분자.
pub const KEY_DELIMITER: char = '.';

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    key: String,
    value: String,
}

/// 기동 시 한 번 만들어지는 읽기 전용 설정 트리.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationTree {
    // 소문자 정규화 키 -> 원본 키/값
    entries: BTreeMap<String, Entry>,
}

impl ConfigurationTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON 문서를 트리로 펼친다. 최상위 요소는 객체여야 한다.
    pub fn from_json(root: &Value) -> Result<Self, String> {
        let Value::Object(map) = root else {
            return Err(format!(
                "top-level JSON element must be an object, found {}",
                json_kind(root)
            ));
        };

        let mut tree = Self::new();
        for (key, value) in map {
            tree.flatten(key, value);
        }
        Ok(tree)
    }

    fn flatten(&mut self, path: &str, value: &Value) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.flatten(&join_key(path, key), child);
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    self.flatten(&join_key(path, &index.to_string()), child);
                }
            }
            // null은 키를 만들지 않는다.
            Value::Null => {}
            Value::String(text) => self.insert(path, text.clone()),
            other => self.insert(path, other.to_string()),
        }
    }

    /// 키/값을 추가한다. 대소문자만 다른 기존 키는 덮어쓴다.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(
            normalize(key),
            Entry {
                key: key.to_string(),
                value: value.into(),
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&normalize(key))
            .map(|entry| entry.value.as_str())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// 후순위(나중 소스) 값으로 덮어쓰는 병합 규칙.
    pub fn merge_from(&mut self, other: ConfigurationTree) {
        self.entries.extend(other.entries);
    }

    /// 이름으로 하위 섹션을 얻는다. 없는 섹션도 빈 섹션으로 반환한다.
    pub fn section(&self, name: &str) -> ConfigurationSection<'_> {
        ConfigurationSection {
            tree: self,
            name: name.to_string(),
            prefix: format!("{}{KEY_DELIMITER}", normalize(name)),
        }
    }
}

/// 설정 트리의 이름 붙은 하위 트리 뷰.
#[derive(Debug, Clone)]
pub struct ConfigurationSection<'a> {
    tree: &'a ConfigurationTree,
    name: String,
    prefix: String,
}

impl<'a> ConfigurationSection<'a> {
    pub fn exists(&self) -> bool {
        self.children().next().is_some()
    }

    /// (섹션 기준 상대 키, 값) 쌍을 순회한다.
    pub fn children(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        let tree: &'a ConfigurationTree = self.tree;
        let prefix_len = self.prefix.len();
        tree.entries
            .range(self.prefix.clone()..)
            .take_while(|(normalized, _)| normalized.starts_with(&self.prefix))
            .map(move |(_, entry)| (&entry.key[prefix_len..], entry.value.as_str()))
    }

    /// 섹션을 타입 구조체로 바인딩한다. 필드 이름은 대소문자를 구분하지 않는다.
    /// 섹션이나 키가 없으면 기본값을 사용하며 별도 검증은 하지 않는다.
    pub fn bind<T>(&self) -> Result<T, StartupError>
    where
        T: DeserializeOwned + Default,
    {
        if !self.exists() {
            return Ok(T::default());
        }

        let mut root = Node::section();
        for (key, value) in self.children() {
            let segments: Vec<&str> = key.split(KEY_DELIMITER).collect();
            root.insert(&segments, value);
        }

        binder::bind(root).map_err(|err| StartupError::ConfigBind {
            section: self.name.clone(),
            reason: err.to_string(),
        })
    }
}

fn join_key(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}{KEY_DELIMITER}{key}")
    }
}

fn normalize(key: &str) -> String {
    key.to_ascii_lowercase()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
