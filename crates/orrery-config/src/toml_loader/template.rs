//! Default TOML scene template with inline documentation comments.

/// Generate the default scene content with comments.
pub(crate) fn default_scene_toml() -> &'static str {
    r##"# Orrery scene
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[stage]
# width = 2048           # logical design units
# height = 2048
# fit = "cover"          # cover | contain

[effects]
# enabled = true
# advanced = "auto"      # auto | off | force

[logging]
# level = "info"         # trace | debug | info | warn | error

# Layers are drawn in order of the number at the end of their id,
# ties broken by id. Positions are percent of the stage.

[[layers]]
id = "dial-0"
image_ref = "dial.png"
# scale = { pct = 100 }

[[layers]]
id = "gear-1"
image_ref = "gear.png"
position = { x_pct = 30, y_pct = 30 }
spin_rpm = 6             # 0-60
spin_dir = "cw"          # cw | ccw

[[layers]]
id = "moon-2"
image_ref = "moon.png"
position = { x_pct = 90, y_pct = 50 }
orbit_rpm = 1            # 0-60
orbit_dir = "ccw"
# orbit_center = { x_pct = 50, y_pct = 50 }
# orbit_phase_deg = 0
# orbit_orient_policy = "auto"   # none | auto | override

[[layers.effects]]
type = "pulse"
amp = 0.05
period_ms = 2000

[[layers]]
id = "seconds-3"
image_ref = "hand.png"

[layers.clock]
spin_hand = "second"     # second | minute | hour
# base = 90              # anchor angles on the sprite box, degrees
# tip = 270
# smooth = true
# format = 12            # 12 | 24
# source = "device"      # device | utc | server
# timezone = "device"    # device or a fixed offset like "+02:00"
# offset_minutes = 0     # used with source = "server"
"##
}
