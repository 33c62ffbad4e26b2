//! XML Schema template
//!
//! Every object becomes a named `complexType` (`<Name>Type`) plus a global element,
//! every enumeration a `simpleType` restriction of `xs:string`. Attributes marked
//! `XML: @name` become `xs:attribute`s, everything else a `xs:element` inside the
//! type's `xs:sequence`. XSD has no union of complex types, so only the first dtype of
//! an attribute is used.

use super::common::{alternatives, escape_xml, kind_of, Kind, UnionPolicy};
use crate::error::ConvertError;
use crate::model::{Attribute, DataModel, Enumeration, Object, PrimitiveType};
use crate::template::{Template, TemplateId};
use std::fmt::Write;

pub struct XsdTemplate;

impl Template for XsdTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::XmlSchema
    }

    fn description(&self) -> &str {
        "XML Schema definition"
    }

    fn file_extension(&self) -> &str {
        "xsd"
    }

    fn render(&self, model: &DataModel) -> Result<String, ConvertError> {
        let mut out = String::new();
        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" elementFormDefault="qualified">"#
        )?;

        for object in &model.objects {
            writeln!(out)?;
            writeln!(
                out,
                r#"  <xs:element name="{}" type="{}"/>"#,
                escape_xml(&object.name),
                type_name(&object.name)
            )?;
        }
        for object in &model.objects {
            writeln!(out)?;
            render_object(&mut out, model, object)?;
        }
        for enumeration in &model.enums {
            writeln!(out)?;
            render_enum(&mut out, enumeration)?;
        }

        writeln!(out)?;
        writeln!(out, "</xs:schema>")?;
        Ok(out)
    }
}

fn type_name(name: &str) -> String {
    format!("{}Type", escape_xml(name))
}

fn xsd_primitive(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::String | PrimitiveType::Identifier => "xs:string",
        PrimitiveType::Integer => "xs:integer",
        PrimitiveType::Float => "xs:double",
        PrimitiveType::Number => "xs:decimal",
        PrimitiveType::Boolean => "xs:boolean",
        PrimitiveType::Bytes => "xs:base64Binary",
        PrimitiveType::Date => "xs:date",
        PrimitiveType::DateTime => "xs:dateTime",
    }
}

/// XSD type of an attribute and whether it is a simple type.
fn attribute_type(model: &DataModel, attribute: &Attribute) -> (String, bool) {
    match alternatives(attribute, UnionPolicy::FirstWins).first() {
        Some(dtype) => match kind_of(model, dtype) {
            Kind::Primitive(primitive) => (xsd_primitive(primitive).to_string(), true),
            Kind::Enum(name) => (type_name(name), true),
            Kind::Object(name) | Kind::Unknown(name) => (type_name(name), false),
        },
        None => ("xs:string".to_string(), true),
    }
}

fn documentation(out: &mut String, text: &str, indent: &str) -> std::fmt::Result {
    if text.is_empty() {
        return Ok(());
    }
    writeln!(out, "{indent}<xs:annotation>")?;
    writeln!(
        out,
        "{indent}  <xs:documentation>{}</xs:documentation>",
        escape_xml(text)
    )?;
    writeln!(out, "{indent}</xs:annotation>")
}

fn render_object(out: &mut String, model: &DataModel, object: &Object) -> std::fmt::Result {
    writeln!(out, r#"  <xs:complexType name="{}">"#, type_name(&object.name))?;
    documentation(out, &object.docstring, "    ")?;

    let (attrs, elements): (Vec<&Attribute>, Vec<&Attribute>) =
        object.attributes.iter().partition(|a| {
            let (_, simple) = attribute_type(model, a);
            a.xml.is_attr && simple && !a.multiple
        });

    if !elements.is_empty() {
        writeln!(out, "    <xs:sequence>")?;
        for attribute in elements {
            let (dtype, _) = attribute_type(model, attribute);
            let min = if attribute.is_required() { "1" } else { "0" };
            let max = if attribute.multiple { "unbounded" } else { "1" };
            let name = if attribute.xml.is_attr {
                &attribute.name
            } else {
                &attribute.xml.name
            };
            if attribute.docstring.is_empty() {
                writeln!(
                    out,
                    r#"      <xs:element name="{}" type="{dtype}" minOccurs="{min}" maxOccurs="{max}"/>"#,
                    escape_xml(name)
                )?;
            } else {
                writeln!(
                    out,
                    r#"      <xs:element name="{}" type="{dtype}" minOccurs="{min}" maxOccurs="{max}">"#,
                    escape_xml(name)
                )?;
                documentation(out, &attribute.docstring, "        ")?;
                writeln!(out, "      </xs:element>")?;
            }
        }
        writeln!(out, "    </xs:sequence>")?;
    }

    for attribute in attrs {
        let (dtype, _) = attribute_type(model, attribute);
        let usage = if attribute.is_required() { "required" } else { "optional" };
        writeln!(
            out,
            r#"    <xs:attribute name="{}" type="{dtype}" use="{usage}"/>"#,
            escape_xml(&attribute.xml.name)
        )?;
    }

    writeln!(out, "  </xs:complexType>")
}

fn render_enum(out: &mut String, enumeration: &Enumeration) -> std::fmt::Result {
    writeln!(out, r#"  <xs:simpleType name="{}">"#, type_name(&enumeration.name))?;
    documentation(out, &enumeration.docstring, "    ")?;
    writeln!(out, r#"    <xs:restriction base="xs:string">"#)?;
    for value in enumeration.mappings.values() {
        writeln!(out, r#"      <xs:enumeration value="{}"/>"#, escape_xml(value))?;
    }
    writeln!(out, "    </xs:restriction>")?;
    writeln!(out, "  </xs:simpleType>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use insta::assert_snapshot;

    fn render(source: &str) -> String {
        XsdTemplate.render(&parse(source).unwrap().model).unwrap()
    }

    #[test]
    fn test_render_objects_and_enums() {
        let source = "### Sample\n- __id__\n  - Type: string\n  - XML: @id\n- tags\n  - Type: string[]\n- color\n  - Type: Color\n\n### Color\n\n```\nRED = \"red\"\n```\n";
        assert_snapshot!(render(source), @r###"
        <?xml version="1.0" encoding="UTF-8"?>
        <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" elementFormDefault="qualified">

          <xs:element name="Sample" type="SampleType"/>

          <xs:complexType name="SampleType">
            <xs:sequence>
              <xs:element name="tags" type="xs:string" minOccurs="0" maxOccurs="unbounded"/>
              <xs:element name="color" type="ColorType" minOccurs="0" maxOccurs="1"/>
            </xs:sequence>
            <xs:attribute name="id" type="xs:string" use="required"/>
          </xs:complexType>

          <xs:simpleType name="ColorType">
            <xs:restriction base="xs:string">
              <xs:enumeration value="red"/>
            </xs:restriction>
          </xs:simpleType>

        </xs:schema>
        "###);
    }

    #[test]
    fn test_union_uses_first_alternative() {
        let out = render("### A\n- v\n  - Type: integer | string\n");
        assert!(out.contains(r#"<xs:element name="v" type="xs:integer""#));
        assert!(!out.contains("xs:string\""));
    }

    #[test]
    fn test_object_typed_xml_attribute_falls_back_to_element() {
        let out = render("### A\n- b\n  - Type: B\n  - XML: @b\n### B\n- x\n  - Type: string\n");
        assert!(out.contains(r#"<xs:element name="b" type="BType""#));
    }
}
