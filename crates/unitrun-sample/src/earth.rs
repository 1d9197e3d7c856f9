//! Tests of one suite may live in several files; they run as one suite.

use crate::planet::earth_radius_km;
use unitrun::prelude::*;

suite!(EarthSuite {
    test_case! {
        fn earth_radius_again(t) {
            check_close!(t, 6370.0, earth_radius_km(), 0.5);
        }
    }
});
