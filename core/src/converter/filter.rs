//! Hidden field removal.

use crate::entity::FieldDefinition;

/// Returns `fields` without hidden entries, descending into groups and arrays.
pub fn remove_hidden_fields(fields: &[FieldDefinition]) -> Vec<FieldDefinition> {
    fields
        .iter()
        .filter(|field| !field.hidden)
        .map(|field| {
            let mut visible = field.clone();
            visible.fields = remove_hidden_fields(&field.fields);
            visible
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::FieldType;

    #[test]
    fn test_removes_nested_hidden_fields() {
        let fields = vec![
            FieldDefinition::new("price", FieldType::Number),
            FieldDefinition::new("internalNotes", FieldType::Textarea).hidden(),
            FieldDefinition::new("meta", FieldType::Group)
                .with_field(FieldDefinition::new("title", FieldType::Text))
                .with_field(FieldDefinition::new("secret", FieldType::Text).hidden()),
        ];
        let visible = remove_hidden_fields(&fields);
        let names: Vec<&str> = visible.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["price", "meta"]);
        assert_eq!(visible[1].fields.len(), 1);
        assert_eq!(visible[1].fields[0].name, "title");
    }
}
