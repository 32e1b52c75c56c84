//! In-game HUD - health, kick budget, boosts and time to sunset.

use bevy::prelude::*;

use crate::core::{GameState, PlayState};
use crate::player::{Boost, Player, PlayerVitals};
use crate::world::SunClock;

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Marker for health bar fill.
#[derive(Component)]
pub struct HealthBar;

/// Marker for the kick budget bar fill.
#[derive(Component)]
pub struct KickBar;

/// Marker for the boost charge counter.
#[derive(Component)]
pub struct BoostText;

/// Marker for the sunset countdown text.
#[derive(Component)]
pub struct SunsetTimerText;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::GameOver), cleanup_hud)
        .add_systems(
            Update,
            (update_health_bar, update_kick_bar, update_boost_text, update_sunset_timer)
                .run_if(in_state(PlayState::Running)),
        );
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // HUD root container (bottom-left corner)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.4, 0.85, 1.0)),
                Node {
                    margin: UiRect::bottom(Val::Px(8.0)),
                    ..default()
                },
                BoostText,
            ));

            // Kick budget bar
            spawn_bar(parent, "Kicks", Color::srgb(0.9, 0.6, 0.1), KickBar);

            // Health bar
            spawn_bar(parent, "Health", Color::srgb(0.8, 0.2, 0.2), HealthBar);
        });

    // Sunset countdown (top-right corner)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                justify_content: JustifyContent::End,
                padding: UiRect::all(Val::Px(20.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.85, 0.6)),
                SunsetTimerText,
            ));
        });
}

/// Helper to spawn a status bar.
fn spawn_bar<M: Component>(parent: &mut ChildBuilder, label: &str, color: Color, bar_marker: M) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            margin: UiRect::bottom(Val::Px(5.0)),
            ..default()
        })
        .with_children(|bar_parent| {
            // Label
            bar_parent.spawn((
                Text::new(label),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
                Node {
                    width: Val::Px(60.0),
                    ..default()
                },
            ));

            // Bar background
            bar_parent
                .spawn((
                    Node {
                        width: Val::Px(150.0),
                        height: Val::Px(12.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                ))
                .with_children(|bg| {
                    // Bar fill
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(color),
                        bar_marker,
                    ));
                });
        });
}

/// Format seconds as `m:ss`.
pub fn format_countdown(seconds: f32) -> String {
    let total = seconds.max(0.0).ceil() as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Boost counter line, `E` to spend a charge.
pub fn boost_label(boosts: u32, active: bool) -> String {
    if active {
        format!("BOOST! x{boosts}")
    } else {
        format!("Boost x{boosts} [E]")
    }
}

/// Update health bar based on player health.
fn update_health_bar(
    player_query: Query<&PlayerVitals, With<Player>>,
    mut bar_query: Query<&mut Node, With<HealthBar>>,
) {
    let Ok(vitals) = player_query.get_single() else {
        return;
    };
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };

    bar.width = Val::Percent(vitals.health() / vitals.max_health() * 100.0);
}

/// Update kick bar with the kicks the player can still take.
fn update_kick_bar(
    player_query: Query<&PlayerVitals, With<Player>>,
    mut bar_query: Query<&mut Node, With<KickBar>>,
) {
    let Ok(vitals) = player_query.get_single() else {
        return;
    };
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };

    bar.width = Val::Percent(vitals.kicks_left_fraction() * 100.0);
}

fn update_boost_text(
    player_query: Query<(&PlayerVitals, &Boost), With<Player>>,
    mut text_query: Query<&mut Text, With<BoostText>>,
) {
    let Ok((vitals, boost)) = player_query.get_single() else {
        return;
    };
    for mut text in text_query.iter_mut() {
        text.0 = boost_label(vitals.boosts(), boost.is_active());
    }
}

fn update_sunset_timer(clock: Res<SunClock>, mut text_query: Query<&mut Text, With<SunsetTimerText>>) {
    for mut text in text_query.iter_mut() {
        text.0 = format!("Sunset in {}", format_countdown(clock.remaining()));
    }
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
