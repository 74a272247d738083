//! The page for recording a new transaction.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        dollar_input_styles, loading_spinner,
    },
    navigation::nav_bar,
    timezone::local_today,
    transaction::TransactionType,
};

fn transaction_type_radio(transaction_type: TransactionType, is_checked: bool) -> Markup {
    let value = transaction_type.as_str();
    let id = format!("transaction-type-{value}");

    html! {
        div class="flex items-center gap-3" {
            input type="radio" name="transaction_type" id=(id) value=(value)
                checked[is_checked] required class=(FORM_RADIO_INPUT_STYLE);
            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (transaction_type) }
        }
    }
}

/// A labelled form field, where `input` must have the id `id`.
fn field(id: &str, label: &str, input: Markup) -> Markup {
    html! {
        div {
            label for=(id) class=(FORM_LABEL_STYLE) { (label) }
            (input)
        }
    }
}

fn create_transaction_view(today: Date) -> Markup {
    let amount_input = html! {
        // The wrapper draws the dollar sign and must span the form.
        div class="input-wrapper w-full" {
            input type="number" name="amount" id="amount" step="0.01" min="0"
                placeholder="0.00" required autofocus class=(FORM_TEXT_INPUT_STYLE);
        }
    };
    let date_input = html! {
        input type="date" name="date" id="date" max=(today) value=(today) required
            class=(FORM_TEXT_INPUT_STYLE);
    };
    let category_input = html! {
        input type="text" name="category" id="category" placeholder="Groceries"
            maxlength="100" class=(FORM_TEXT_INPUT_STYLE);
    };
    let description_input = html! {
        input type="text" name="description" id="description"
            placeholder="Weekly shop" class=(FORM_TEXT_INPUT_STYLE);
    };

    let content = html! {
        (nav_bar(endpoints::NEW_TRANSACTION_VIEW))

        div class=(FORM_CONTAINER_STYLE) {
            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Record a transaction" }

                fieldset class="space-y-2" {
                    legend class=(FORM_LABEL_STYLE) { "Type" }

                    div class=(FORM_RADIO_GROUP_STYLE) {
                        (transaction_type_radio(TransactionType::Expense, true))
                        (transaction_type_radio(TransactionType::Income, false))
                    }
                }

                (field("amount", "Amount", amount_input))
                (field("date", "Date", date_input))
                (field("category", "Category", category_input))
                (field("description", "Description", description_input))

                button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE) {
                    span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                    " Save transaction"
                }
            }
        }
    };

    base("New Transaction", &[dollar_input_styles()], &content)
}

/// The state for the new transaction page, which needs to know what "today"
/// is for the date picker.
#[derive(Debug, Clone)]
pub struct CreateTransactionPageState {
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the form for recording a transaction, dated today by default.
pub async fn get_create_transaction_page(
    State(state): State<CreateTransactionPageState>,
) -> Result<Response, Error> {
    let max_date = local_today(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone)
    })?;

    Ok(create_transaction_view(max_date).into_response())
}
