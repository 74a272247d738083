//! Card components for displaying how far each goal has been funded.

use maud::{Markup, html};

use crate::{
    dashboard::allocation::GoalProgress,
    endpoints,
    html::{LINK_STYLE, format_currency},
};

/// Formats a percentage as a whole number, rounding down so that a goal only
/// shows "100%" once it is fully funded.
fn format_percentage(value: f64) -> String {
    let floored = value.clamp(0.0, 100.0).floor();
    if floored == 0.0 {
        "0".to_string()
    } else {
        format!("{floored:.0}")
    }
}

/// Renders the goal cards section, or an empty state if there are no goals.
pub(super) fn goal_cards_view(goal_progress: &[GoalProgress]) -> Markup {
    html! {
        section id="goals" class="w-full mx-auto" {
            div class="flex justify-between items-baseline mb-4" {
                h3 class="text-xl font-semibold" {
                    "Goals"
                }

                a href=(endpoints::GOALS_VIEW) class=(LINK_STYLE) {
                    "Manage goals"
                }
            }

            @if goal_progress.is_empty() {
                (empty_state_view())
            } @else {
                div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4" {
                    @for progress in goal_progress {
                        (goal_card(progress))
                    }
                }
            }
        }
    }
}

/// Renders a single goal card.
fn goal_card(goal_progress: &GoalProgress) -> Markup {
    let goal = &goal_progress.goal;
    let percentage = format_percentage(goal_progress.progress);
    let is_complete = goal_progress.progress >= 100.0;

    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-4 shadow-md
                   flex flex-col justify-between"
            data-goal-card="true"
            aria-label=(format!(
                "{}: {} of {} funded, {}%",
                goal.title,
                format_currency(goal_progress.funded_amount),
                format_currency(goal.target_amount.amount()),
                percentage,
            ))
        {
            div {
                h4 class="text-lg font-semibold mb-3 truncate" title=(goal.title) {
                    (goal.title)
                }

                div class="text-sm text-gray-600 dark:text-gray-400 mb-2" {
                    span class="font-semibold text-gray-900 dark:text-white" {
                        (format_currency(goal_progress.funded_amount))
                    }
                    " of " (format_currency(goal.target_amount.amount()))
                }

                (progress_bar(goal_progress.progress, is_complete))

                div class="text-2xl font-bold" data-goal-progress="true" {
                    (percentage) "%"
                }
            }

            div class="mt-3 text-sm text-gray-600 dark:text-gray-400" {
                "Deadline: " time datetime=(goal.deadline) { (goal.deadline) }
            }
        }
    }
}

/// Renders a horizontal progress bar for a goal.
fn progress_bar(percentage: f64, is_complete: bool) -> Markup {
    let clamped = percentage.clamp(0.0, 100.0);

    // Ensure minimum 3% width so rounded corners are visible
    let display_percentage = if clamped > 0.0 && clamped < 3.0 {
        3.0
    } else {
        clamped
    };

    let bar_colour = if is_complete {
        "bg-green-600 dark:bg-green-500"
    } else {
        "bg-blue-600 dark:bg-blue-500"
    };

    html! {
        div
            class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-2.5 mb-2"
            role="progressbar"
            aria-valuenow=(format_percentage(clamped))
            aria-valuemin="0"
            aria-valuemax="100"
        {
            @if clamped > 0.0 {
                div
                    class={ (bar_colour) " h-2.5 rounded-full transition-all" }
                    style=(format!("width: {:.1}%", display_percentage))
                {}
            }
        }
    }
}

/// Renders an empty state when the user has no goals.
fn empty_state_view() -> Markup {
    html! {
        div
            id="goals-empty"
            class="bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-8 shadow-md
                   text-center max-w-md mx-auto"
        {
            p class="text-gray-700 dark:text-gray-300 mb-4" {
                "You have not set any savings goals yet."
            }
            a href=(endpoints::NEW_GOAL_VIEW) class=(LINK_STYLE) {
                "Create a goal"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        auth::UserID,
        dashboard::allocation::GoalProgress,
        goal::{Goal, GoalTitle, TargetAmount},
    };

    use super::{format_percentage, goal_cards_view};

    fn goal_progress(title: &str, progress: f64, funded: Decimal) -> GoalProgress {
        GoalProgress {
            goal: Goal {
                id: 1,
                user_id: UserID::new(1),
                title: GoalTitle::new_unchecked(title),
                target_amount: TargetAmount::new_unchecked(Decimal::from(200)),
                deadline: date!(2030 - 06 - 01),
            },
            progress,
            funded_amount: funded,
        }
    }

    #[test]
    fn format_percentage_rounds_down_and_avoids_negative_zero() {
        assert_eq!(format_percentage(33.333), "33");
        assert_eq!(format_percentage(99.6), "99");
        assert_eq!(format_percentage(99.999), "99");
        assert_eq!(format_percentage(100.0), "100");
        assert_eq!(format_percentage(-0.2), "0");
        assert_eq!(format_percentage(-0.0), "0");
    }

    #[test]
    fn nearly_funded_goal_is_not_shown_as_complete() {
        let markup = goal_cards_view(&[goal_progress("Car", 99.75, Decimal::new(19950, 2))]);

        let html = Html::parse_fragment(&markup.into_string());
        let percentage = html
            .select(&Selector::parse("[data-goal-progress]").unwrap())
            .map(|element| element.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(percentage, vec!["99%"]);
        assert_eq!(
            html.select(&Selector::parse(".bg-green-600").unwrap()).count(),
            0
        );
    }

    #[test]
    fn renders_one_card_per_goal() {
        let markup = goal_cards_view(&[
            goal_progress("Holiday", 100.0, Decimal::from(200)),
            goal_progress("Car", 12.5, Decimal::from(25)),
        ]);

        let html = Html::parse_fragment(&markup.into_string());
        let percentages = html
            .select(&Selector::parse("[data-goal-progress]").unwrap())
            .map(|element| element.text().collect::<String>())
            .collect::<Vec<_>>();
        assert_eq!(percentages, vec!["100%", "12%"]);

        let first_card = html
            .select(&Selector::parse("[data-goal-card]").unwrap())
            .next()
            .unwrap();
        let text = first_card.text().collect::<String>();
        assert!(text.contains("$200.00 of $200.00"), "got {text}");
        assert!(text.contains("2030-06-01"), "got {text}");
    }

    #[test]
    fn unfunded_goal_has_empty_progress_bar() {
        let markup = goal_cards_view(&[goal_progress("Car", 0.0, Decimal::ZERO)]);

        let html = Html::parse_fragment(&markup.into_string());
        let bar = html
            .select(&Selector::parse("[role=progressbar]").unwrap())
            .next()
            .unwrap();
        assert_eq!(bar.value().attr("aria-valuenow"), Some("0"));
        assert_eq!(bar.children().count(), 0);
    }

    #[test]
    fn renders_empty_state_without_goals() {
        let markup = goal_cards_view(&[]);

        let html = Html::parse_fragment(&markup.into_string());
        assert!(
            html.select(&Selector::parse("#goals-empty").unwrap())
                .next()
                .is_some()
        );
    }
}
