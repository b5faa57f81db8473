use nostr_sdk::prelude::*;

use crate::events::{client_tag, lookup_ref_tag, owner_tag, NostrTag};
use crate::lookup::lookup_tag;
use crate::publish::SaveOptions;

/// Index tags for a record: owner, client, then one `e` tag for the
/// associated event and one for the name. Duplicates are kept.
pub fn build_tags(main_pubkey: &PublicKey, client_name: &str, options: &SaveOptions) -> Vec<NostrTag> {
    let mut tags = vec![owner_tag(main_pubkey), client_tag(client_name)];

    if let Some(reference) = &options.associated_event {
        tags.push(lookup_ref_tag(&lookup_tag(reference)));
    }

    if let Some(name) = &options.name {
        tags.push(lookup_ref_tag(&lookup_tag(name)));
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{tag_values, DEFAULT_CLIENT_NAME, TAG_LOOKUP};

    #[test]
    fn test_named_record_tags() {
        let main = Keys::generate().public_key();
        let options = SaveOptions::named("alice");
        let tags = build_tags(&main, DEFAULT_CLIENT_NAME, &options);

        assert_eq!(tags.len(), 3);
        assert_eq!(tags[0].name, "p");
        assert_eq!(tags[0].values, vec![main.to_hex()]);
        assert_eq!(tags[1].name, "client");
        assert_eq!(tags[1].values, vec!["cofabricate".to_string()]);
        assert_eq!(tag_values(&tags, TAG_LOOKUP), vec![lookup_tag("alice").as_str()]);
        assert_eq!(tags[2].name, "e");
    }

    #[test]
    fn test_event_then_name_order() {
        let main = Keys::generate().public_key();
        let options = SaveOptions::for_event("note1listing").with_name("alice");
        let tags = build_tags(&main, DEFAULT_CLIENT_NAME, &options);

        let event_tag = lookup_tag("note1listing");
        let name_tag = lookup_tag("alice");
        assert_eq!(
            tag_values(&tags, TAG_LOOKUP),
            vec![event_tag.as_str(), name_tag.as_str()]
        );
        assert_eq!(tags[0].name, "p");
        assert_eq!(tags[1].name, "client");
    }

    #[test]
    fn test_no_lookup_tags_without_associations() {
        let main = Keys::generate().public_key();
        let tags = build_tags(&main, "custom-client", &SaveOptions::default());
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].values, vec!["custom-client".to_string()]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let main = Keys::generate().public_key();
        let options = SaveOptions::for_event("same").with_name("same");
        let tags = build_tags(&main, DEFAULT_CLIENT_NAME, &options);
        assert_eq!(tag_values(&tags, TAG_LOOKUP).len(), 2);
    }
}
