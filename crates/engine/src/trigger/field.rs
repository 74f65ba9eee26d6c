//! Commands that mutate field state.

use fieldhost_domain::{
    BreakableState, Buff, FieldProperty, FieldPropertyKind, InteractState, Item, Vector3,
    WeatherType,
};
use fieldhost_shared::{
    BreakableMessage, CameraMessage, FieldMessage, FieldPropertyMessage, PortalMessage,
    TriggerMessage,
};

use super::{TriggerContext, FIELD_ACTOR_OBJECT_ID};

impl TriggerContext {
    // =========================================================================
    // Field properties
    // =========================================================================

    pub fn change_background(&self, dds: &str) {
        tracing::debug!(map_id = %self.field.map_id(), dds, "ChangeBackground");
        self.field.set_background(dds);
    }

    pub fn enable_local_camera(&self, enabled: bool) {
        tracing::debug!(map_id = %self.field.map_id(), enabled, "EnableLocalCamera");
        self.field.add_property(FieldProperty::LocalCamera { enabled });
    }

    pub fn lock_my_pc(&self, is_lock: bool) {
        tracing::debug!(map_id = %self.field.map_id(), is_lock, "LockMyPc");
        if is_lock {
            self.field.add_property(FieldProperty::LockPlayer);
        } else {
            self.field.remove_property(FieldPropertyKind::LockPlayer);
        }
    }

    pub fn set_ambient_light(&self, color: Vector3) {
        tracing::debug!(map_id = %self.field.map_id(), %color, "SetAmbientLight");
        self.field.add_property(FieldProperty::AmbientLight { color });
    }

    pub fn set_directional_light(&self, diffuse_color: Vector3, specular_color: Vector3) {
        tracing::debug!(
            map_id = %self.field.map_id(),
            %diffuse_color,
            %specular_color,
            "SetDirectionalLight"
        );
        self.field.add_property(FieldProperty::DirectionalLight {
            diffuse_color,
            specular_color,
        });
    }

    pub fn set_gravity(&self, gravity: f32) {
        tracing::debug!(map_id = %self.field.map_id(), gravity, "SetGravity");
        self.field.add_property(FieldProperty::Gravity { gravity });
    }

    pub fn set_photo_studio(&self, enabled: bool) {
        tracing::debug!(map_id = %self.field.map_id(), enabled, "SetPhotoStudio");
        self.field.add_property(FieldProperty::PhotoStudio { enabled });
    }

    /// Broadcast only; the symbols are not kept on the field.
    pub fn user_tag_symbol(&self, symbol1: &str, symbol2: &str) {
        tracing::debug!(map_id = %self.field.map_id(), symbol1, symbol2, "UserTagSymbol");
        self.field.broadcast(FieldPropertyMessage::UserTagSymbol {
            symbol1: symbol1.to_string(),
            symbol2: symbol2.to_string(),
        });
    }

    pub fn visible_my_pc(&self, visible: bool) {
        tracing::debug!(map_id = %self.field.map_id(), visible, "VisibleMyPc");
        if visible {
            self.field.remove_property(FieldPropertyKind::HidePlayer);
        } else {
            self.field.add_property(FieldProperty::HidePlayer);
        }
    }

    pub fn weather(&self, weather: WeatherType) {
        tracing::debug!(map_id = %self.field.map_id(), ?weather, "Weather");
        self.field.add_property(FieldProperty::Weather { weather });
    }

    /// `range` is carried by scripts but unused; `range_z` becomes the sight
    /// range and `border` its opacity.
    pub fn sight_range(&self, enabled: bool, range: u8, range_z: f32, border: u8) {
        tracing::debug!(
            map_id = %self.field.map_id(),
            enabled,
            range,
            range_z,
            border,
            "SightRange"
        );
        if enabled {
            self.field.add_property(FieldProperty::SightRange {
                range: range_z,
                opacity: border,
            });
        } else {
            self.field.remove_property(FieldPropertyKind::SightRange);
        }
    }

    pub fn set_time_scale(
        &self,
        enabled: bool,
        start_scale: f32,
        end_scale: f32,
        duration: f32,
        interpolator: u8,
    ) {
        tracing::debug!(
            map_id = %self.field.map_id(),
            enabled,
            start_scale,
            end_scale,
            duration,
            interpolator,
            "SetTimeScale"
        );
        self.field.broadcast(FieldPropertyMessage::TimeScale {
            enabled,
            start_scale,
            end_scale,
            duration,
            interpolator,
        });
    }

    // =========================================================================
    // Cameras
    // =========================================================================

    pub fn set_local_camera(&self, camera_id: i32, enabled: bool) {
        tracing::debug!(map_id = %self.field.map_id(), camera_id, enabled, "SetLocalCamera");
        self.field
            .broadcast(CameraMessage::Local { camera_id, enabled });
    }

    pub fn camera_reset(&self, interpolation_time: f32) {
        tracing::debug!(map_id = %self.field.map_id(), interpolation_time, "CameraReset");
        self.field.broadcast(CameraMessage::Interpolate {
            time: interpolation_time,
        });
    }

    pub fn camera_select(&self, trigger_id: i32, enabled: bool) {
        tracing::debug!(map_id = %self.field.map_id(), trigger_id, enabled, "CameraSelect");
        self.update_object(&self.field.objects().cameras, trigger_id, |camera| {
            if camera.visible == enabled {
                return false;
            }
            camera.visible = enabled;
            true
        });
    }

    pub fn camera_select_path(&self, path_ids: &[i32], return_view: bool) {
        tracing::debug!(map_id = %self.field.map_id(), ?path_ids, return_view, "CameraSelectPath");
        self.field.broadcast(TriggerMessage::CameraStart {
            path_ids: path_ids.to_vec(),
            return_view,
        });
    }

    // =========================================================================
    // Trigger objects
    // =========================================================================

    pub fn set_actor(&self, trigger_id: i32, visible: bool, initial_sequence: &str) {
        tracing::debug!(
            map_id = %self.field.map_id(),
            trigger_id,
            visible,
            initial_sequence,
            "SetActor"
        );
        self.update_object(&self.field.objects().actors, trigger_id, |actor| {
            actor.visible = visible;
            actor.sequence_name = initial_sequence.to_string();
            true
        });
    }

    /// Set visibility on `random_count` of the cubes (or all of them when the
    /// count does not select a proper subset).
    pub fn set_cube(&self, trigger_ids: &[i32], visible: bool, random_count: i32) {
        tracing::debug!(
            map_id = %self.field.map_id(),
            ?trigger_ids,
            visible,
            random_count,
            "SetCube"
        );
        for trigger_id in self.random_subset(trigger_ids, random_count) {
            self.update_object(&self.field.objects().cubes, trigger_id, |cube| {
                if cube.visible == visible {
                    return false;
                }
                cube.visible = visible;
                true
            });
        }
    }

    pub fn set_effect(&self, trigger_ids: &[i32], visible: bool) {
        tracing::debug!(map_id = %self.field.map_id(), ?trigger_ids, visible, "SetEffect");
        for &trigger_id in trigger_ids {
            self.update_object(&self.field.objects().effects, trigger_id, |effect| {
                if effect.visible == visible {
                    return false;
                }
                effect.visible = visible;
                true
            });
        }
    }

    pub fn set_ladder(&self, trigger_id: i32, visible: bool, animation_effect: bool, animation_delay: i32) {
        tracing::debug!(
            map_id = %self.field.map_id(),
            trigger_id,
            visible,
            animation_effect,
            animation_delay,
            "SetLadder"
        );
        self.update_object(&self.field.objects().ladders, trigger_id, |ladder| {
            ladder.visible = visible;
            ladder.animate = animation_effect;
            ladder.delay = animation_delay;
            true
        });
    }

    /// Show or hide meshes, after `delay_ms` when positive. A `scale` of 0
    /// keeps each mesh's scale.
    pub fn set_mesh(&self, trigger_ids: &[i32], visible: bool, fade: i32, delay_ms: i32, scale: f32) {
        tracing::debug!(
            map_id = %self.field.map_id(),
            ?trigger_ids,
            visible,
            fade,
            delay_ms,
            scale,
            "SetMesh"
        );
        self.update_mesh(trigger_ids, visible, fade, delay_ms, scale);
    }

    pub fn set_mesh_animation(&self, trigger_ids: &[i32], visible: bool, fade: i32) {
        tracing::debug!(
            map_id = %self.field.map_id(),
            ?trigger_ids,
            visible,
            fade,
            "SetMeshAnimation"
        );
        for &trigger_id in trigger_ids {
            self.update_object(&self.field.objects().meshes, trigger_id, |mesh| {
                if mesh.visible == visible {
                    return false;
                }
                mesh.visible = visible;
                mesh.fade = fade;
                true
            });
        }
    }

    pub fn set_random_mesh(&self, trigger_ids: &[i32], visible: bool, mesh_count: i32, fade: i32, delay_ms: i32) {
        tracing::debug!(
            map_id = %self.field.map_id(),
            ?trigger_ids,
            visible,
            mesh_count,
            fade,
            delay_ms,
            "SetRandomMesh"
        );
        let picked = self.random_subset(trigger_ids, mesh_count);
        self.update_mesh(&picked, visible, fade, delay_ms, 0.0);
    }

    pub fn set_rope(&self, trigger_id: i32, visible: bool, animation_effect: bool, animation_delay: i32) {
        tracing::debug!(
            map_id = %self.field.map_id(),
            trigger_id,
            visible,
            animation_effect,
            animation_delay,
            "SetRope"
        );
        self.update_object(&self.field.objects().ropes, trigger_id, |rope| {
            rope.visible = visible;
            rope.animate = animation_effect;
            rope.delay = animation_delay;
            true
        });
    }

    pub fn set_sound(&self, trigger_id: i32, enabled: bool) {
        tracing::debug!(map_id = %self.field.map_id(), trigger_id, enabled, "SetSound");
        self.update_object(&self.field.objects().sounds, trigger_id, |sound| {
            sound.visible = enabled;
            true
        });
    }

    pub fn set_portal(&self, portal_id: i32, visible: bool, enabled: bool, minimap_visible: bool) {
        tracing::debug!(
            map_id = %self.field.map_id(),
            portal_id,
            visible,
            enabled,
            minimap_visible,
            "SetPortal"
        );
        let updated = self.field.update_portal(portal_id, |portal| {
            portal.visible = visible;
            portal.enabled = enabled;
            portal.minimap_visible = minimap_visible;
        });
        match updated {
            Some(portal) => self.field.broadcast(PortalMessage::Update(portal)),
            None => tracing::debug!(map_id = %self.field.map_id(), portal_id, "Unknown portal"),
        }
    }

    /// Enabled breakables are shown, disabled ones hidden. One broadcast
    /// covers every breakable that was found.
    pub fn set_breakable(&self, trigger_ids: &[i32], enabled: bool) {
        tracing::debug!(map_id = %self.field.map_id(), ?trigger_ids, enabled, "SetBreakable");
        let state = if enabled {
            BreakableState::Show
        } else {
            BreakableState::Hide
        };
        let updated = self
            .field
            .update_breakables(trigger_ids, |breakable| breakable.state = state);
        if !updated.is_empty() {
            self.field.broadcast(BreakableMessage::Update(updated));
        }
    }

    pub fn set_visible_breakable_object(&self, trigger_ids: &[i32], visible: bool) {
        tracing::debug!(
            map_id = %self.field.map_id(),
            ?trigger_ids,
            visible,
            "SetVisibleBreakableObject"
        );
        let updated = self
            .field
            .update_breakables(trigger_ids, |breakable| breakable.visible = visible);
        if !updated.is_empty() {
            self.field.broadcast(BreakableMessage::Update(updated));
        }
    }

    pub fn set_interact_object(&self, interact_ids: &[i32], state: u8) {
        let state = match InteractState::try_from(state) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(map_id = %self.field.map_id(), error = %e, "SetInteractObject");
                return;
            }
        };
        tracing::debug!(map_id = %self.field.map_id(), ?interact_ids, ?state, "SetInteractObject");
        self.field.set_interact_state(interact_ids, state);
    }

    // =========================================================================
    // Buffs
    // =========================================================================

    /// Buff every player (or monster) standing in any of the boxes.
    pub fn add_buff(&self, box_ids: &[i32], buff_id: i32, level: i16, is_player: bool, is_skill_set: bool) {
        tracing::debug!(
            map_id = %self.field.map_id(),
            ?box_ids,
            buff_id,
            level,
            is_player,
            is_skill_set,
            "AddBuff"
        );
        if is_skill_set {
            tracing::error!(map_id = %self.field.map_id(), buff_id, "AddBuff: skill sets not implemented");
            return;
        }

        let targets = if is_player {
            self.field.players_in_boxes(box_ids)
        } else {
            self.field.monsters_in_boxes(box_ids)
        };
        for object_id in targets {
            self.field.add_buff(
                object_id,
                Buff {
                    id: buff_id,
                    level,
                    caster_object_id: FIELD_ACTOR_OBJECT_ID,
                },
            );
        }
    }

    pub fn remove_buff(&self, box_id: i32, buff_id: i32, is_player: bool) {
        tracing::debug!(map_id = %self.field.map_id(), box_id, buff_id, is_player, "RemoveBuff");
        let targets = if is_player {
            self.field.players_in_boxes(&[box_id])
        } else {
            self.field.monsters_in_boxes(&[box_id])
        };
        for object_id in targets {
            self.field.remove_buff(object_id, buff_id);
        }
    }

    // =========================================================================
    // Items
    // =========================================================================

    fn create_item_from_metadata(&self, item_id: i32, amount: i32, rarity: Option<i16>) -> Option<Item> {
        let Some(metadata) = self.item_metadata.try_get(item_id) else {
            tracing::warn!(map_id = %self.field.map_id(), item_id, "Unknown item");
            return None;
        };
        let rarity = rarity.unwrap_or(metadata.rarity);
        Some(Item::from_metadata(&metadata, amount, rarity))
    }

    /// Drop `item_id` (0 for none) plus each spawn point's individual drop
    /// box at every listed spawn point.
    pub fn create_item(&self, spawn_ids: &[i32], item_id: i32) {
        tracing::debug!(map_id = %self.field.map_id(), ?spawn_ids, item_id, "CreateItem");
        for &spawn_id in spawn_ids {
            let Some(spawn) = self.field.item_spawn(spawn_id) else {
                tracing::debug!(map_id = %self.field.map_id(), spawn_id, "Unknown item spawn");
                continue;
            };

            let mut items = Vec::new();
            if item_id != 0 {
                items.extend(self.create_item_from_metadata(item_id, 1, None));
            }
            if spawn.individual_drop_box_id > 0 {
                for entry in self.drop_boxes.individual_drop_box(spawn.individual_drop_box_id) {
                    items.extend(self.create_item_from_metadata(
                        entry.item_id,
                        entry.amount,
                        Some(entry.rarity),
                    ));
                }
            }

            for item in items {
                let dropped = self.field.spawn_item(spawn.position, spawn.rotation, item, true);
                self.field.broadcast(FieldMessage::DropItem(dropped));
            }
        }
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Start (or replace) a timer. `show_dialog` shows a countdown to players.
    pub fn set_timer(&self, timer_id: &str, seconds: i32, show_dialog: bool) {
        tracing::debug!(map_id = %self.field.map_id(), timer_id, seconds, show_dialog, "SetTimer");
        let timer = self
            .field
            .set_timer(timer_id, i64::from(seconds) * 1_000);
        if show_dialog {
            self.field.broadcast(TriggerMessage::TimerDialog {
                timer_id: timer_id.to_string(),
                start_tick: timer.start_tick(),
                duration_ms: timer.duration_ms(),
            });
        }
    }

    pub fn reset_timer(&self, timer_id: &str) {
        tracing::debug!(map_id = %self.field.map_id(), timer_id, "ResetTimer");
        if let Some(timer) = self.field.reset_timer(timer_id) {
            self.field.broadcast(TriggerMessage::TimerDialog {
                timer_id: timer_id.to_string(),
                start_tick: timer.start_tick(),
                duration_ms: timer.duration_ms(),
            });
        }
    }

    // =========================================================================
    // Not implemented
    // =========================================================================

    pub fn set_pvp_zone(&self, box_id: i32, duration: i32, additional_effect_id: i32, box_ids: &[i32]) {
        tracing::error!(
            map_id = %self.field.map_id(),
            box_id,
            duration,
            additional_effect_id,
            ?box_ids,
            "SetPvpZone not implemented"
        );
    }

    pub fn set_agent(&self, trigger_ids: &[i32], visible: bool) {
        tracing::error!(map_id = %self.field.map_id(), ?trigger_ids, visible, "SetAgent not implemented");
    }

    pub fn set_skill(&self, trigger_ids: &[i32], enabled: bool) {
        tracing::error!(map_id = %self.field.map_id(), ?trigger_ids, enabled, "SetSkill not implemented");
    }

    pub fn spawn_item_range(&self, range_ids: &[i32], random_pick_count: i32) {
        tracing::error!(
            map_id = %self.field.map_id(),
            ?range_ids,
            random_pick_count,
            "SpawnItemRange not implemented"
        );
    }

    pub fn start_combine_spawn(&self, group_ids: &[i32], is_start: bool) {
        tracing::error!(
            map_id = %self.field.map_id(),
            ?group_ids,
            is_start,
            "StartCombineSpawn not implemented"
        );
    }

    pub fn room_expire(&self) {
        tracing::error!(map_id = %self.field.map_id(), "RoomExpire not implemented");
    }

    pub fn field_war_end(&self, is_clear: bool) {
        tracing::error!(map_id = %self.field.map_id(), is_clear, "FieldWarEnd not implemented");
    }
}
