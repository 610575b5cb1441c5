#![no_main]

//! Level file fuzzer.
//!
//! Feeds arbitrary text to the level parser. Anything it accepts must be a
//! level whose grid covers every room and whose key and exit sit on
//! passable tiles.

use libfuzzer_sys::fuzz_target;
use snarl::levels;

fuzz_target!(|text: &str| {
    let Ok(parsed) = levels::parse_levels(text) else {
        return;
    };

    for level in &parsed {
        let grid = level.grid();
        for room in level.rooms() {
            let origin = room.origin();
            assert!(origin.x + room.width() <= grid.width());
            assert!(origin.y + room.height() <= grid.height());
        }

        for at in [level.key(), level.exit()] {
            let tile = level.tile(at).expect("object inside the grid");
            assert!(!tile.has_block(), "object on a wall at {at}");
        }

        let rendered = level.render();
        assert_eq!(rendered.lines().count(), usize::from(grid.height()));
    }
});
