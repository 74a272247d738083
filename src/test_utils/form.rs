//! Assertions about the forms rendered by page handlers.

use scraper::{ElementRef, Html, Selector};

fn select_first<'a>(element: &ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).unwrap();
    element.select(&selector).next()
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// The first form in `html`.
#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("want a form in the HTML, found none")
}

/// Assert that `form` sends its data to `endpoint` via the HTMX `attribute`,
/// e.g. "hx-post".
#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    assert_eq!(
        form.value().attr(attribute),
        Some(endpoint),
        "want form with {attribute}=\"{endpoint}\""
    );
}

#[track_caller]
fn must_get_required_input<'a>(form: &ElementRef<'a>, name: &str, type_: &str) -> ElementRef<'a> {
    let input = select_first(form, &format!("input[name='{name}']"))
        .unwrap_or_else(|| panic!("want an input named {name:?}, found none"));

    assert_eq!(
        input.value().attr("type"),
        Some(type_),
        "want input {name:?} to have type {type_:?}"
    );
    assert!(
        input.value().attr("required").is_some(),
        "want input {name:?} to be required"
    );

    input
}

/// Assert that `form` has a required input called `name` of type `type_`.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    must_get_required_input(form, name, type_);
}

/// Like [assert_form_input], but also checks the input's initial `value`.
#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef<'_>,
    name: &str,
    type_: &str,
    value: &str,
) {
    let input = must_get_required_input(form, name, type_);

    assert_eq!(
        input.value().attr("value").unwrap_or_default(),
        value,
        "want input {name:?} to start with the value {value:?}"
    );
}

#[track_caller]
fn must_get_submit_button<'a>(form: &ElementRef<'a>) -> ElementRef<'a> {
    let button = select_first(form, "button").expect("want a button in the form, found none");

    assert_eq!(
        button.value().attr("type"),
        Some("submit"),
        "want the form's button to submit it"
    );

    button
}

#[track_caller]
pub(crate) fn assert_form_submit_button(form: &ElementRef<'_>) {
    must_get_submit_button(form);
}

#[track_caller]
pub(crate) fn assert_form_submit_button_with_text(form: &ElementRef<'_>, text: &str) {
    let button = must_get_submit_button(form);

    assert_eq!(text_of(&button), text);
}

/// Assert that the first paragraph in `form` is `want_error_message`.
#[track_caller]
pub(crate) fn assert_form_error_message(form: &ElementRef<'_>, want_error_message: &str) {
    let paragraph = select_first(form, "p").expect("want an error message, found none");

    assert_eq!(text_of(&paragraph), want_error_message);
}
