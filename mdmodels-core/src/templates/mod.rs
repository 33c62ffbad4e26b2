//! Built-in conversion templates
//!
//! One module per target, each exposing unit structs that implement
//! [`crate::template::Template`]. They all walk the model the same way: objects in
//! source order, then enumerations, attributes in source order. Shared pieces
//! (case conversion, escaping, the union policy) live in [`common`].
//!
//! | Template              | Extension | Unions                 |
//! |-----------------------|-----------|------------------------|
//! | `markdown`            | md        | `a \| b`               |
//! | `json-schema`         | json      | `anyOf`                |
//! | `xsd`                 | xsd       | first alternative      |
//! | `python-pydantic-xml` | py        | `Union[...]`           |
//! | `python-pydantic`     | py        | `Union[...]`           |
//! | `python-dataclass`    | py        | `Union[...]`           |
//! | `rust`                | rs        | first alternative      |
//! | `golang`              | go        | first alternative      |
//! | `typescript`          | ts        | `t.union([...])`       |
//! | `typescript-zod`      | ts        | `z.union([...])`       |
//! | `protobuf`            | proto     | first alternative      |
//! | `graphql`             | graphql   | first alternative      |
//! | `linkml`              | yaml      | `any_of`               |
//! | `julia`               | jl        | `Union{...}`           |
//! | `mermaid`             | mmd       | `a \| b`               |
//! | `mkdocs`              | md        | `a or b`               |
//! | `shacl`               | ttl       | `sh:or`                |
//! | `shex`                | shex      | `OR`                   |

pub mod common;
pub mod golang;
pub mod graphql;
pub mod json_schema;
pub mod julia;
pub mod linkml;
pub mod markdown;
pub mod mermaid;
pub mod mkdocs;
pub mod protobuf;
pub mod python;
pub mod rdf;
pub mod rust;
pub mod shacl;
pub mod shex;
pub mod typescript;
pub mod xsd;
