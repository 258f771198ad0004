//! Client-side validation for the song submission and admin edit forms.
//!
//! Validation never talks to the server. The server still has the final say, its rejection
//! message is reported by [`crate::state::SongStore`].

use std::{collections::BTreeMap, fmt};

use reqwest::Url;
use riffshare_types::{NewSong, SongChangeSet, SongType, Tuning};
use strum::Display;

/// The inputs of the forms, used to key [`FormErrors`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    Artist,
    Title,
    Type,
    Tuning,
    CustomTuning,
    Link,
    Author,
    ValidationCode,
}

/// Per-field validation messages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<Field, &'static str>);

impl FormErrors {
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn insert(&mut self, field: Field, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Please correct the errors")?;
        for (field, message) in self.iter() {
            write!(f, "\n  {field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

/// Check `link` is an absolute http(s) url with a host.
fn is_web_link(link: &str) -> bool {
    Url::parse(link.trim()).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// The song submission form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongForm {
    pub artist: String,
    pub title: String,
    /// Which parts the chart covers, at least one is required
    pub types: Vec<SongType>,
    pub tuning: Tuning,
    /// Only used when `tuning` is [`Tuning::Custom`]
    pub custom_tuning: String,
    pub link: String,
    pub author: String,
    pub validation_code: String,
}

impl SongForm {
    /// Validate the form, producing the submission payload.
    ///
    /// `expected_code` is the configured submission code. When set, the entered code must match
    /// it. The entered code is forwarded to the server either way.
    ///
    /// # Errors
    ///
    /// Returns every invalid field with its message.
    pub fn validate(&self, expected_code: Option<&str>) -> Result<NewSong, FormErrors> {
        let mut errors = FormErrors::default();

        if blank(&self.artist) {
            errors.insert(Field::Artist, "Artist is required");
        }
        if blank(&self.title) {
            errors.insert(Field::Title, "Title is required");
        }
        if self.types.is_empty() {
            errors.insert(Field::Type, "Select at least one type");
        }
        if self.tuning == Tuning::Custom && blank(&self.custom_tuning) {
            errors.insert(Field::CustomTuning, "Custom tuning is required");
        }
        if blank(&self.link) {
            errors.insert(Field::Link, "Link is required");
        } else if !is_web_link(&self.link) {
            errors.insert(Field::Link, "Link must start with http:// or https://");
        }
        if blank(&self.author) {
            errors.insert(Field::Author, "Your name is required");
        }

        let code = self.validation_code.trim();
        if let Some(expected) = expected_code.map(str::trim) {
            if code.is_empty() {
                errors.insert(Field::ValidationCode, "Validation code is required");
            } else if code != expected {
                errors.insert(
                    Field::ValidationCode,
                    "Incorrect validation code (available on the community channel)",
                );
            }
        }

        errors.into_result(|| {
            let mut types: Vec<SongType> = Vec::with_capacity(self.types.len());
            for song_type in &self.types {
                if !types.contains(song_type) {
                    types.push(*song_type);
                }
            }
            NewSong {
                artist: self.artist.trim().to_owned(),
                title: self.title.trim().to_owned(),
                song_type: SongType::join(&types),
                tuning: match self.tuning {
                    Tuning::Custom => self.custom_tuning.trim().to_owned(),
                    preset => preset.to_string(),
                },
                link: self.link.trim().to_owned(),
                author: self.author.trim().to_owned(),
                validation_code: (!code.is_empty()).then(|| code.to_owned()),
            }
        })
    }
}

/// The admin edit form, fields left as `None` are unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditForm {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub song_type: Option<String>,
    pub tuning: Option<String>,
    pub link: Option<String>,
    pub author: Option<String>,
}

impl EditForm {
    /// Validate the form, producing the changeset to apply.
    ///
    /// # Errors
    ///
    /// Provided fields must not be blank, and a provided link must be an http(s) url.
    pub fn validate(&self) -> Result<SongChangeSet, FormErrors> {
        let mut errors = FormErrors::default();
        let mut check = |field, value: &Option<String>, message| {
            if value.as_deref().is_some_and(blank) {
                errors.insert(field, message);
            }
        };
        check(Field::Artist, &self.artist, "Artist cannot be empty");
        check(Field::Title, &self.title, "Title cannot be empty");
        check(Field::Type, &self.song_type, "Type cannot be empty");
        check(Field::Tuning, &self.tuning, "Tuning cannot be empty");
        check(Field::Link, &self.link, "Link cannot be empty");
        check(Field::Author, &self.author, "Author cannot be empty");

        if self
            .link
            .as_deref()
            .is_some_and(|link| !blank(link) && !is_web_link(link))
        {
            errors.insert(Field::Link, "Link must start with http:// or https://");
        }

        let trimmed = |value: &Option<String>| value.as_deref().map(|v| v.trim().to_owned());
        errors.into_result(|| SongChangeSet {
            artist: trimmed(&self.artist),
            title: trimmed(&self.title),
            song_type: trimmed(&self.song_type),
            tuning: trimmed(&self.tuning),
            link: trimmed(&self.link),
            author: trimmed(&self.author),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn filled() -> SongForm {
        SongForm {
            artist: " Tool ".into(),
            title: "Schism".into(),
            types: vec![SongType::Bass, SongType::Lead],
            tuning: Tuning::DropD,
            custom_tuning: String::new(),
            link: "https://example.com/schism".into(),
            author: "justin".into(),
            validation_code: "ROCK".into(),
        }
    }

    #[rstest]
    fn test_valid_form(filled: SongForm) {
        let song = filled.validate(Some("ROCK")).unwrap();
        assert_eq!(
            song,
            NewSong {
                artist: "Tool".into(),
                title: "Schism".into(),
                song_type: "bass, lead".into(),
                tuning: "Drop D".into(),
                link: "https://example.com/schism".into(),
                author: "justin".into(),
                validation_code: Some("ROCK".into()),
            }
        );
    }

    #[rstest]
    fn test_custom_tuning(mut filled: SongForm) {
        filled.tuning = Tuning::Custom;
        let errors = filled.validate(None).unwrap_err();
        assert_eq!(errors.get(Field::CustomTuning), Some("Custom tuning is required"));

        filled.custom_tuning = "Open G".into();
        assert_eq!(filled.validate(None).unwrap().tuning, "Open G");
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = SongForm::default().validate(Some("ROCK")).unwrap_err();
        assert_eq!(
            errors.iter().map(|(field, _)| field).collect::<Vec<_>>(),
            vec![
                Field::Artist,
                Field::Title,
                Field::Type,
                Field::Link,
                Field::Author,
                Field::ValidationCode
            ]
        );
        assert_eq!(errors.get(Field::ValidationCode), Some("Validation code is required"));
    }

    #[rstest]
    #[case("ftp://example.com/file", false)]
    #[case("www.example.com", false)]
    #[case("httpfoo", false)]
    #[case("http://", false)]
    #[case("http://example.com", true)]
    #[case(" https://drive.example.com/a?b=c ", true)]
    fn test_link_rule(mut filled: SongForm, #[case] link: &str, #[case] valid: bool) {
        filled.link = link.into();
        let result = filled.validate(None);
        assert_eq!(result.is_ok(), valid, "{link}");
        if !valid {
            assert_eq!(
                result.unwrap_err().get(Field::Link),
                Some("Link must start with http:// or https://")
            );
        }
    }

    #[rstest]
    #[case(Some("ROCK"), "rock", false)]
    #[case(Some("ROCK"), " ROCK ", true)]
    #[case(None, "", true)]
    #[case(None, "anything", true)]
    fn test_validation_code(
        mut filled: SongForm,
        #[case] expected: Option<&str>,
        #[case] entered: &str,
        #[case] valid: bool,
    ) {
        filled.validation_code = entered.into();
        assert_eq!(filled.validate(expected).is_ok(), valid);
    }

    #[rstest]
    fn test_code_is_omitted_when_blank(mut filled: SongForm) {
        filled.validation_code = "  ".into();
        assert_eq!(filled.validate(None).unwrap().validation_code, None);
    }

    #[test]
    fn test_errors_display() {
        let errors = SongForm {
            types: vec![SongType::Lead],
            link: "https://example.com".into(),
            author: "me".into(),
            title: "t".into(),
            ..Default::default()
        }
        .validate(None)
        .unwrap_err();
        assert_eq!(
            errors.to_string(),
            "Please correct the errors\n  artist: Artist is required"
        );
    }

    #[test]
    fn test_edit_form() {
        let form = EditForm {
            title: Some(" New title ".into()),
            link: Some("https://example.com/new".into()),
            ..Default::default()
        };
        assert_eq!(
            form.validate().unwrap(),
            SongChangeSet {
                title: Some("New title".into()),
                link: Some("https://example.com/new".into()),
                ..Default::default()
            }
        );
    }

    #[rstest]
    #[case(EditForm { artist: Some(" ".into()), ..Default::default() }, Field::Artist)]
    #[case(EditForm { link: Some("example.com".into()), ..Default::default() }, Field::Link)]
    #[case(EditForm { tuning: Some(String::new()), ..Default::default() }, Field::Tuning)]
    fn test_edit_form_errors(#[case] form: EditForm, #[case] field: Field) {
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get(field).is_some());
    }
}
