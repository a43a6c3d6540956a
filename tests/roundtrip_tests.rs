//! Loading the text of a compiled object and compiling it again gives the same text

#[macro_use]
mod common;

use proptest::prelude::*;
use xmlcore::prelude::*;

xml_type!(Tag, {
    Ok(SchemaBuilder::element(ElementOptions::new("tag").with_namespace("urn:feed"))?
        .attribute("scheme", AttributeOptions::new().with_default(""))?
        .content("label", ContentOptions::new().with_required(true))?
        .build())
});

xml_collection!(Tags, Tag, {
    Ok(SchemaBuilder::element(
        ElementOptions::new("tags")
            .with_namespace("urn:feed")
            .with_parser(Tag::parser()),
    )?
    .build())
});

xml_type!(Entry, {
    Ok(SchemaBuilder::element(ElementOptions::new("entry").with_namespace("urn:feed"))?
        .attribute("id", AttributeOptions::new().with_required(true))?
        .attribute(
            "rank",
            AttributeOptions::new()
                .with_converter(create_converter(ConverterType::Integer))
                .with_default(0i64),
        )?
        .child("title", ChildOptions::new())?
        .nested("tags", NestedOptions::new(Tags::parser()))?
        .build())
});

#[derive(Debug, Clone)]
struct EntryData {
    id: String,
    rank: i64,
    title: Option<String>,
    tags: Vec<(Option<String>, String)>,
}

fn entry_data() -> impl Strategy<Value = EntryData> {
    (
        "[a-z0-9]{1,8}",
        -5i64..5,
        prop::option::of("[a-zA-Z0-9 <>&\"']{1,12}"),
        prop::collection::vec(
            (prop::option::of("[a-z]{1,4}"), "[a-zA-Z<>&]{1,8}"),
            0..4,
        ),
    )
        .prop_map(|(id, rank, title, tags)| EntryData {
            id,
            rank,
            title,
            tags,
        })
}

fn build(data: &EntryData) -> Entry {
    let mut entry = Entry::create().unwrap();
    entry.object.set("id", data.id.as_str()).unwrap();
    entry.object.set("rank", data.rank).unwrap();
    if let Some(title) = &data.title {
        entry.object.set("title", title.as_str()).unwrap();
    }

    let tags = entry.object.child_as_mut::<Tags>("tags").unwrap();
    for (scheme, label) in &data.tags {
        let mut tag = Tag::create().unwrap();
        if let Some(scheme) = scheme {
            tag.object.set("scheme", scheme.as_str()).unwrap();
        }
        tag.object.set("label", label.as_str()).unwrap();
        tags.0.push(tag);
    }
    entry
}

proptest! {
    #[test]
    fn load_then_compile_gives_same_text(data in entry_data()) {
        let text = build(&data).to_text().unwrap();

        let mut loaded = Entry::load(text.as_str()).unwrap();
        prop_assert_eq!(loaded.to_text().unwrap(), text.clone());

        // force a fresh compile from the loaded fields
        loaded.object.set("id", data.id.as_str()).unwrap();
        prop_assert_eq!(loaded.to_text().unwrap(), text);
    }

    #[test]
    fn loaded_fields_match_source(data in entry_data()) {
        let text = build(&data).to_text().unwrap();
        let loaded = Entry::load(text.as_str()).unwrap();

        prop_assert_eq!(loaded.object.text("id"), Some(data.id.as_str()));
        prop_assert_eq!(
            loaded.object.value("rank").and_then(XmlValue::as_i64),
            Some(data.rank)
        );
        prop_assert_eq!(loaded.object.text("title"), data.title.as_deref());

        let tags = loaded.object.child_as::<Tags>("tags").unwrap();
        prop_assert_eq!(tags.0.len(), data.tags.len());
        for (tag, (scheme, label)) in tags.0.iter().zip(&data.tags) {
            prop_assert_eq!(tag.object.text("label"), Some(label.as_str()));
            prop_assert_eq!(tag.object.text("scheme"), Some(scheme.as_deref().unwrap_or("")));
        }
    }
}
