//! The standard scenario layouts.
//!
//! - [`scenario_a`]: three unconnected addresses, two equidistant from the first.
//! - [`scenario_b`]: one line `1-2`, with address 3 nearer to 2 than 1 is.
//! - [`scenario_c`]: lines 10 and 11 joining the same pair in opposite directions.
//! - [`scenario_d`]: the path `1-2-3-4`.

use fablink_core::Layout;

use crate::LayoutBuilder;

pub fn scenario_a() -> Layout {
    LayoutBuilder::new()
        .address(1, [0.0, 0.0, 0.0])
        .address(2, [10.0, 0.0, 0.0])
        .address(3, [0.0, 10.0, 0.0])
        .build()
}

pub fn scenario_b() -> Layout {
    LayoutBuilder::new()
        .address(1, [0.0, 0.0, 0.0])
        .address(2, [3.0, 0.0, 0.0])
        .address(3, [3.0, 5.0, 0.0])
        .line(1, 1, 2)
        .build()
}

pub fn scenario_c() -> Layout {
    LayoutBuilder::new()
        .address(1, [0.0, 0.0, 0.0])
        .address(2, [1.0, 0.0, 0.0])
        .line(10, 1, 2)
        .line(11, 2, 1)
        .build()
}

pub fn scenario_d() -> Layout {
    LayoutBuilder::new()
        .address(1, [0.0, 0.0, 0.0])
        .address(2, [1.0, 0.0, 0.0])
        .address(3, [2.0, 0.0, 0.0])
        .address(4, [3.0, 0.0, 0.0])
        .line(1, 1, 2)
        .line(2, 2, 3)
        .line(3, 3, 4)
        .build()
}
