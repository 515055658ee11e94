//! Focus point resolution for images.
//!
//! A focus point is the pixel an image should stay centred on when cropped:
//! the mean center of the largest faces when there are any, otherwise the
//! most visually salient spot, otherwise the image center.

pub mod shared {
    pub mod constants;
    pub mod face_box;
    pub mod focus_point;
    pub mod frame;
}

pub mod detection {
    pub mod domain {
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod saliency {
    pub mod domain {
        pub mod saliency_estimator;
        pub mod saliency_map;
    }
    pub mod infrastructure;
}

pub mod focus {
    pub mod domain {
        pub mod face_selection;
        pub mod focus_resolver;
    }
    pub mod infrastructure;
}

pub mod imaging {
    pub mod domain {
        pub mod image_source;
        pub mod image_writer;
    }
    pub mod infrastructure;
}

pub mod rendering {
    pub mod debug_renderer;
}

pub mod pipeline {
    pub mod detect_faces_use_case;
    pub mod focus_point_use_case;
    pub mod saliency_map_use_case;
}
