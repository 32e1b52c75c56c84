//! UI plugin - HUD, pause menu and the game-over screen.

use bevy::prelude::*;

use super::hud;
use crate::core::{GameOutcome, GameState, Outcome, PlayState};

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Setup HUD systems
        hud::setup_hud_systems(app);

        app
            // Pause menu
            .add_systems(OnEnter(PlayState::Paused), setup_pause_menu)
            .add_systems(Update, menu_input.run_if(in_state(PlayState::Paused)))
            .add_systems(OnExit(PlayState::Paused), cleanup_pause_menu)

            // Game over
            .add_systems(OnEnter(GameState::GameOver), setup_game_over)
            .add_systems(Update, menu_input.run_if(in_state(GameState::GameOver)))
            .add_systems(OnExit(GameState::GameOver), cleanup_game_over);
    }
}

/// Marker for pause menu UI entities.
#[derive(Component)]
struct PauseMenuUi;

/// Marker for game over UI entities.
#[derive(Component)]
struct GameOverUi;

/// Marker for menu buttons.
#[derive(Component)]
enum MenuButton {
    Resume,
    Retry,
    Quit,
}

const BUTTON_IDLE: Color = Color::srgb(0.22, 0.14, 0.1);
const BUTTON_HOVERED: Color = Color::srgb(0.36, 0.22, 0.14);
const BUTTON_PRESSED: Color = Color::srgb(0.5, 0.3, 0.16);
const BUTTON_TEXT: Color = Color::srgb(0.95, 0.88, 0.75);

/// Full-screen column that centers its children over a tinted backdrop.
fn overlay(tint: Color) -> (Node, BackgroundColor) {
    (
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            row_gap: Val::Px(12.0),
            ..default()
        },
        BackgroundColor(tint),
    )
}

fn label(text: &str, font_size: f32, color: Color) -> (Text, TextFont, TextColor) {
    (
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(color),
    )
}

/// Helper to spawn a menu button.
fn spawn_menu_button(parent: &mut ChildBuilder, text: &str, button: MenuButton) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(220.0),
                height: Val::Px(48.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BorderRadius::all(Val::Px(6.0)),
            BackgroundColor(BUTTON_IDLE),
            button,
        ))
        .with_children(|button| {
            button.spawn(label(text, 24.0, BUTTON_TEXT));
        });
}

fn setup_pause_menu(mut commands: Commands) {
    commands
        .spawn((overlay(Color::srgba(0.0, 0.0, 0.0, 0.7)), PauseMenuUi))
        .with_children(|parent| {
            parent.spawn(label("PAUSED", 48.0, BUTTON_TEXT));
            spawn_menu_button(parent, "Resume", MenuButton::Resume);
            spawn_menu_button(parent, "Quit", MenuButton::Quit);
        });
}

fn cleanup_pause_menu(mut commands: Commands, query: Query<Entity, With<PauseMenuUi>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

/// Title and color of the game-over banner.
fn banner(outcome: Option<Outcome>) -> (&'static str, Color) {
    match outcome {
        Some(Outcome::Won) => ("YOU SURVIVED THE DAY", Color::srgb(1.0, 0.75, 0.3)),
        Some(Outcome::Lost) | None => ("KICKED OUT", Color::srgb(0.85, 0.25, 0.2)),
    }
}

/// Shown over the slowed-down scene once the round is decided.
fn setup_game_over(mut commands: Commands, outcome: Res<GameOutcome>) {
    let (title, color) = banner(outcome.get());

    commands
        .spawn((overlay(Color::srgba(0.05, 0.02, 0.0, 0.6)), GameOverUi))
        .with_children(|parent| {
            parent.spawn(label(title, 64.0, color));
            parent.spawn(label("Press R to play again", 20.0, Color::srgb(0.8, 0.8, 0.8)));
            spawn_menu_button(parent, "Retry", MenuButton::Retry);
            spawn_menu_button(parent, "Quit", MenuButton::Quit);
        });
}

/// Handle pause and game-over button interactions.
fn menu_input(
    mut interaction_query: Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut next_game_state: ResMut<NextState<GameState>>,
    mut next_play_state: ResMut<NextState<PlayState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                *bg_color = BUTTON_PRESSED.into();
                match button {
                    MenuButton::Resume => next_play_state.set(PlayState::Running),
                    MenuButton::Retry => next_game_state.set(GameState::InGame),
                    MenuButton::Quit => {
                        exit.send(AppExit::Success);
                    }
                }
            }
            Interaction::Hovered => {
                *bg_color = BUTTON_HOVERED.into();
            }
            Interaction::None => {
                *bg_color = BUTTON_IDLE.into();
            }
        }
    }
}

/// Clean up game over entities.
fn cleanup_game_over(mut commands: Commands, ui_query: Query<Entity, With<GameOverUi>>) {
    for entity in ui_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
