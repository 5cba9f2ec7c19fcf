//! Citation and reference networks.
//!
//! Turns records whose trees were built with
//! [`Record::build_citation_tree`] or [`Record::build_reference_tree`] into
//! JSON. A record with fetched links becomes `{repr: [children...]}`, any
//! other record becomes its `repr` string. Nothing here touches the network.

use crate::error::Result;
use crate::record::Record;
use crate::types::Relation;
use serde_json::{Map, Value};

/// Output layout for [`export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    /// One tree per root.
    Nested,
    /// Every node of the tree, depth-first, in a single list.
    Flat,
}

/// Nested JSON tree of `records` following `relation`.
pub fn nodes<F>(records: &[Record], relation: Relation, repr: F) -> Value
where
    F: Fn(&Record) -> String,
{
    let mut flat = Vec::new();
    Value::Array(walk(records, relation, &repr, &mut flat))
}

/// Serialize the network of `records` as JSON text.
pub fn export<F>(records: &[Record], relation: Relation, structure: Structure, repr: F) -> Result<String>
where
    F: Fn(&Record) -> String,
{
    let mut flat = Vec::new();
    let tree = walk(records, relation, &repr, &mut flat);
    let data = match structure {
        Structure::Nested => Value::Array(tree),
        Structure::Flat => Value::Array(flat),
    };
    Ok(serde_json::to_string_pretty(&data)?)
}

fn walk<F>(records: &[Record], relation: Relation, repr: &F, flat: &mut Vec<Value>) -> Vec<Value>
where
    F: Fn(&Record) -> String,
{
    records
        .iter()
        .map(|record| {
            let node = match record.linked(relation) {
                Some(children) => {
                    let branch = walk(children, relation, repr, flat);
                    let mut map = Map::new();
                    map.insert(repr(record), Value::Array(branch));
                    Value::Object(map)
                }
                None => Value::String(repr(record)),
            };
            flat.push(node.clone());
            node
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockApi;
    use serde_json::json;

    fn root(api: &MockApi) -> Record {
        let mut fields = Map::new();
        fields.insert("id".into(), json!("1"));
        fields.insert("bibcode".into(), json!("root"));
        Record::new(fields).with_client(api.client())
    }

    fn bibcode(record: &Record) -> String {
        record.bibcode().unwrap_or_default().to_string()
    }

    #[test]
    fn test_unbuilt_record_is_a_leaf() {
        let api = MockApi::with_docs(1);
        let tree = nodes(&[root(&api)], Relation::Citations, bibcode);
        assert_eq!(tree, json!(["root"]));
    }

    #[test]
    fn test_nested_tree() {
        let api = MockApi::with_docs(1);
        let mut paper = root(&api);
        paper.build_citation_tree(1).unwrap();

        let tree = nodes(std::slice::from_ref(&paper), Relation::Citations, bibcode);
        assert_eq!(tree, json!([{"root": ["root/1", "root/2"]}]));

        let other = nodes(std::slice::from_ref(&paper), Relation::References, bibcode);
        assert_eq!(other, json!(["root"]));
    }

    #[test]
    fn test_export_flat() {
        let api = MockApi::with_docs(1);
        let mut paper = root(&api);
        paper.build_reference_tree(1).unwrap();

        let text = export(
            std::slice::from_ref(&paper),
            Relation::References,
            Structure::Flat,
            bibcode,
        )
        .unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed,
            json!(["root/1", "root/2", {"root": ["root/1", "root/2"]}])
        );
    }
}
