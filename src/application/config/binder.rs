//! 설정 섹션 → 타입 구조체 바인더.
//!
//! 값은 모두 문자열로 들어오므로 숫자/불리언 필드는 바인딩 시점에 파싱한다.
//! 구조체 필드와 enum variant 이름은 ASCII 대소문자를 구분하지 않고 맞춘다.

use std::fmt::Display;
use std::str::FromStr;

use serde::de::value::{Error as BindError, MapDeserializer, SeqDeserializer};
use serde::de::{self, DeserializeOwned, IntoDeserializer, Unexpected, Visitor};
use serde::forward_to_deserialize_any;

/// 섹션 하위 트리 노드.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Value(String),
    Section(Vec<(String, Node)>),
}

impl Node {
    pub(crate) fn section() -> Self {
        Node::Section(Vec::new())
    }

    /// 경로 조각을 따라 값을 넣는다. 같은 경로에 값이 먼저 있으면 값을 우선한다.
    pub(crate) fn insert(&mut self, segments: &[&str], value: &str) {
        let Node::Section(children) = self else {
            return;
        };
        match segments {
            [] => {}
            [last] => children.push(((*last).to_string(), Node::Value(value.to_string()))),
            [head, rest @ ..] => {
                let position = children.iter().position(|(key, _)| key == head);
                let child = match position {
                    Some(index) => &mut children[index].1,
                    None => {
                        children.push(((*head).to_string(), Node::section()));
                        let last = children.len() - 1;
                        &mut children[last].1
                    }
                };
                child.insert(rest, value);
            }
        }
    }
}

pub(crate) fn bind<T: DeserializeOwned>(node: Node) -> Result<T, BindError> {
    T::deserialize(node)
}

fn parse_scalar<T>(text: &str) -> Result<T, BindError>
where
    T: FromStr,
    T::Err: Display,
{
    text.trim()
        .parse()
        .map_err(|err| de::Error::custom(format!("invalid value '{text}': {err}")))
}

fn match_name(key: String, names: &[&'static str]) -> String {
    names
        .iter()
        .find(|name| name.eq_ignore_ascii_case(&key))
        .map(|name| (*name).to_string())
        .unwrap_or(key)
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
                match self {
                    Node::Value(text) => visitor.$visit(parse_scalar(&text)?),
                    section => section.deserialize_any(visitor),
                }
            }
        )*
    };
}

impl<'de> IntoDeserializer<'de, BindError> for Node {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

impl<'de> de::Deserializer<'de> for Node {
    type Error = BindError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self {
            Node::Value(text) => visitor.visit_string(text),
            Node::Section(children) => visitor.visit_map(MapDeserializer::new(children.into_iter())),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self {
            Node::Value(text) if text.trim().eq_ignore_ascii_case("true") => visitor.visit_bool(true),
            Node::Value(text) if text.trim().eq_ignore_ascii_case("false") => {
                visitor.visit_bool(false)
            }
            Node::Value(text) => Err(de::Error::invalid_value(Unexpected::Str(&text), &visitor)),
            section => section.deserialize_any(visitor),
        }
    }

    deserialize_parsed! {
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_f32 => visit_f32,
        deserialize_f64 => visit_f64,
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, BindError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self {
            Node::Section(mut children) => {
                // 배열 원소 키는 인덱스이므로 숫자 순서로 정렬한다.
                children.sort_by_key(|(key, _)| key.parse::<usize>().unwrap_or(usize::MAX));
                let items = children.into_iter().map(|(_, node)| node);
                visitor.visit_seq(SeqDeserializer::new(items))
            }
            Node::Value(text) => Err(de::Error::invalid_type(Unexpected::Str(&text), &visitor)),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, BindError> {
        match self {
            Node::Section(children) => {
                let renamed = children
                    .into_iter()
                    .map(|(key, node)| (match_name(key, fields), node));
                visitor.visit_map(MapDeserializer::new(renamed))
            }
            Node::Value(text) => Err(de::Error::invalid_type(Unexpected::Str(&text), &visitor)),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, BindError> {
        match self {
            Node::Value(text) => {
                let variant: de::value::StringDeserializer<BindError> =
                    match_name(text.trim().to_string(), variants).into_deserializer();
                visitor.visit_enum(variant)
            }
            Node::Section(_) => Err(de::Error::invalid_type(Unexpected::Map, &visitor)),
        }
    }

    forward_to_deserialize_any! {
        char str string bytes byte_buf unit unit_struct tuple tuple_struct map
        identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Limits {
        #[serde(rename = "MaxItems")]
        max_items: u32,
        #[serde(rename = "Enabled")]
        enabled: bool,
        #[serde(rename = "Mode")]
        mode: Mode,
        #[serde(rename = "Hosts")]
        hosts: Vec<String>,
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    enum Mode {
        #[default]
        Fast,
        Safe,
    }

    fn node(pairs: &[(&str, &str)]) -> Node {
        let mut root = Node::section();
        for (key, value) in pairs {
            let segments: Vec<&str> = key.split('.').collect();
            root.insert(&segments, value);
        }
        root
    }

    #[test]
    fn field_names_match_without_case() {
        let limits: Limits = bind(node(&[("maxitems", "7"), ("ENABLED", "True")])).unwrap();
        assert_eq!(limits.max_items, 7);
        assert!(limits.enabled);
    }

    #[test]
    fn enum_variants_match_without_case() {
        let limits: Limits = bind(node(&[("Mode", "safe")])).unwrap();
        assert_eq!(limits.mode, Mode::Safe);
    }

    #[test]
    fn index_keys_bind_to_sequence_in_numeric_order() {
        let pairs: Vec<(String, String)> = (0..11)
            .map(|i| (format!("Hosts.{i}"), format!("h{i}")))
            .rev()
            .collect();
        let borrowed: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let limits: Limits = bind(node(&borrowed)).unwrap();
        assert_eq!(limits.hosts.len(), 11);
        assert_eq!(limits.hosts[0], "h0");
        assert_eq!(limits.hosts[10], "h10");
    }

    #[test]
    fn unparsable_number_is_an_error() {
        let err = bind::<Limits>(node(&[("MaxItems", "lots")])).unwrap_err();
        assert!(err.to_string().contains("invalid value 'lots'"));
    }
}
