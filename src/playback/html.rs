//! A self-contained HTML player for recorded animations.
//!
//! Frames are embedded as inline SVG documents in a JSON array; a small
//! script drives a slider, play/pause/step buttons, a speed control and the
//! loop mode.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::Animation;
use crate::{AnimoError, AnimoResult};

/// What the player does when it reaches the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// Start again from the first frame
    #[default]
    Loop,
    /// Stop on the last frame
    Once,
    /// Play backwards, then forwards again
    Reflect,
}

impl LoopMode {
    /// Name used by the player controls
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loop => "loop",
            Self::Once => "once",
            Self::Reflect => "reflect",
        }
    }
}

/// Player options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlOptions {
    /// Behavior at the last frame
    pub loop_mode: LoopMode,
    /// Start playing as soon as the page loads
    pub autoplay: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            loop_mode: LoopMode::Loop,
            autoplay: false,
        }
    }
}

static PLAYER_ID: AtomicUsize = AtomicUsize::new(0);

const TEMPLATE: &str = r#"<div class="animo-player" id="__ID__">
  <div class="animo-frame" id="__ID__-frame"></div>
  <input type="range" id="__ID__-slider" min="0" max="__LAST__" value="0" style="width: 100%">
  <div class="animo-controls">
    <button data-action="first">|&lt;</button>
    <button data-action="prev">&lt;</button>
    <button data-action="reverse">&#9664;</button>
    <button data-action="pause">&#10074;&#10074;</button>
    <button data-action="play">&#9654;</button>
    <button data-action="next">&gt;</button>
    <button data-action="last">&gt;|</button>
    <button data-action="slower">&minus;</button>
    <button data-action="faster">+</button>
  </div>
  <form class="animo-loop" id="__ID__-loop">
    <label><input type="radio" name="loop" value="once"> Once</label>
    <label><input type="radio" name="loop" value="loop"> Loop</label>
    <label><input type="radio" name="loop" value="reflect"> Reflect</label>
  </form>
</div>
<script>
(function() {
  var frames = __FRAMES__;
  var root = document.getElementById("__ID__");
  var view = document.getElementById("__ID__-frame");
  var slider = document.getElementById("__ID__-slider");
  var loopForm = document.getElementById("__ID__-loop");
  var interval = __INTERVAL__;
  var index = 0, direction = 0, timer = null;

  loopForm.querySelector('input[value="__LOOP__"]').checked = true;

  function loopMode() {
    return loopForm.querySelector('input[name="loop"]:checked').value;
  }
  function show(i) {
    index = Math.max(0, Math.min(frames.length - 1, i));
    view.innerHTML = frames[index];
    slider.value = index;
  }
  function stop() {
    if (timer !== null) { clearInterval(timer); timer = null; }
    direction = 0;
  }
  function tick() {
    var next = index + direction;
    if (next >= frames.length || next < 0) {
      var mode = loopMode();
      if (mode === "loop") {
        next = direction > 0 ? 0 : frames.length - 1;
      } else if (mode === "reflect") {
        direction = -direction;
        next = index + direction;
      } else {
        stop();
        return;
      }
    }
    show(next);
  }
  function start(dir) {
    stop();
    direction = dir;
    timer = setInterval(tick, interval);
  }

  var actions = {
    first: function() { stop(); show(0); },
    last: function() { stop(); show(frames.length - 1); },
    prev: function() { stop(); show(index - 1); },
    next: function() { stop(); show(index + 1); },
    play: function() { start(1); },
    reverse: function() { start(-1); },
    pause: stop,
    slower: function() { interval *= 1.3; if (timer !== null) { start(direction); } },
    faster: function() { interval /= 1.3; if (timer !== null) { start(direction); } }
  };
  root.querySelectorAll("button[data-action]").forEach(function(button) {
    button.addEventListener("click", actions[button.dataset.action]);
  });
  slider.addEventListener("input", function() { stop(); show(parseInt(slider.value, 10)); });

  show(0);
  if (__AUTOPLAY__) { start(1); }
})();
</script>
"#;

/// An interactive HTML player holding every frame as inline SVG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlDisplay {
    frames: Vec<String>,
    interval: Duration,
    options: HtmlOptions,
}

impl HtmlDisplay {
    /// Render every frame of `animation` to SVG.
    pub fn new(animation: &Animation, options: HtmlOptions) -> AnimoResult<Self> {
        Self::from_frames(animation.to_svg_frames()?, animation.interval(), options)
    }

    /// Build a player from already rendered SVG documents.
    pub fn from_frames(
        frames: Vec<String>,
        interval: Duration,
        options: HtmlOptions,
    ) -> AnimoResult<Self> {
        if frames.is_empty() {
            return Err(AnimoError::invalid_parameter(
                "frames",
                "a player needs at least one frame",
            ));
        }
        Ok(Self {
            frames,
            interval,
            options,
        })
    }

    /// Number of frames in the player
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Player options
    pub const fn options(&self) -> &HtmlOptions {
        &self.options
    }

    /// The player as an HTML fragment, ready to embed in a page or notebook.
    pub fn to_html(&self) -> AnimoResult<String> {
        // "</" would end the script element early.
        let frames = serde_json::to_string(&self.frames)?.replace("</", "<\\/");
        let id = format!("animo-{}", PLAYER_ID.fetch_add(1, Ordering::Relaxed));
        Ok(TEMPLATE
            .replace("__ID__", &id)
            .replace("__LAST__", &(self.frames.len() - 1).to_string())
            .replace("__INTERVAL__", &self.interval.as_millis().to_string())
            .replace("__LOOP__", self.options.loop_mode.as_str())
            .replace("__AUTOPLAY__", if self.options.autoplay { "true" } else { "false" })
            .replace("__FRAMES__", &frames))
    }

    /// Write the player to `path` as a complete HTML page.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> AnimoResult<()> {
        let path = path.as_ref();
        let page = format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>animo</title></head>\n<body>\n{}</body>\n</html>\n",
            self.to_html()?
        );
        std::fs::write(path, page)?;
        info!(path = %path.display(), frames = self.frames.len(), "html player written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display(options: HtmlOptions) -> HtmlDisplay {
        let frames = vec![
            "<svg id=\"a\"></svg>".to_string(),
            "<svg id=\"b\"></svg>".to_string(),
            "<svg id=\"c\"></svg>".to_string(),
        ];
        HtmlDisplay::from_frames(frames, Duration::from_millis(80), options).unwrap()
    }

    #[test]
    fn test_frames_are_embedded_as_json() {
        let html = display(HtmlOptions::default()).to_html().unwrap();
        assert!(html.contains(r#"var frames = ["<svg id=\"a\"><\/svg>","#));
        assert!(!html.contains("</svg>"));
        assert!(html.contains("max=\"2\""));
        assert!(html.contains("var interval = 80;"));
        assert!(!html.contains("__"));
    }

    #[test]
    fn test_loop_mode_is_preselected() {
        let options = HtmlOptions {
            loop_mode: LoopMode::Reflect,
            autoplay: true,
        };
        let html = display(options).to_html().unwrap();
        assert!(html.contains(r#"input[value="reflect"]"#));
        assert!(html.contains("if (true) { start(1); }"));
    }

    #[test]
    fn test_players_get_distinct_ids() {
        let player = display(HtmlOptions::default());
        let first = player.to_html().unwrap();
        let second = player.to_html().unwrap();
        let id = |html: &str| html.split('"').nth(3).map(str::to_string);
        assert_ne!(id(&first), id(&second));
    }

    #[test]
    fn test_empty_player_is_rejected() {
        let result = HtmlDisplay::from_frames(Vec::new(), Duration::from_millis(10), HtmlOptions::default());
        assert!(matches!(result, Err(AnimoError::InvalidParameter { .. })));
    }

    #[test]
    fn test_save_writes_page() {
        let dir = std::env::temp_dir().join("animo_html_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("player.html");
        display(HtmlOptions::default()).save(&path).unwrap();
        let page = std::fs::read_to_string(&path).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("animo-player"));
    }

    #[test]
    fn test_loop_mode_serde() {
        let options: HtmlOptions = serde_json::from_str(r#"{"loop_mode": "once"}"#).unwrap();
        assert_eq!(options.loop_mode, LoopMode::Once);
        assert!(!options.autoplay);
    }
}
