/// Column-major 4x4 matrix, laid out the way std140 `mat4` consumes it.
pub type Mat4 = [[f32; 4]; 4];

const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [[0.0f32; 4]; 4];
    for (col, b_col) in b.iter().enumerate() {
        for row in 0..4 {
            out[col][row] = (0..4).map(|k| a[k][row] * b_col[k]).sum();
        }
    }
    out
}

/// Fixed orthographic camera framing the unit plane head-on.
///
/// The frustum spans extent 1 in each axis (±0.5), with generous near/far
/// planes and the eye at z = 2 looking toward the origin. The projection is
/// square and independent of the surface aspect ratio; `update_projection`
/// is still invoked after every aspect-relevant resize for parity with the
/// rendering contract, making the recompute an intentional no-op under the
/// fixed frustum. The revision counter makes those recomputes observable.
#[derive(Debug, Clone)]
pub struct OrthographicCamera {
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
    position: [f32; 3],
    view_projection: Mat4,
    revision: u32,
}

impl OrthographicCamera {
    /// Frustum extent along each axis.
    pub const FRUSTUM_SIZE: f32 = 1.0;

    pub fn new() -> Self {
        let half = Self::FRUSTUM_SIZE / 2.0;
        let mut camera = Self {
            left: -half,
            right: half,
            bottom: -half,
            top: half,
            near: -1000.0,
            far: 1000.0,
            position: [0.0, 0.0, 2.0],
            view_projection: IDENTITY,
            revision: 0,
        };
        camera.recompute();
        camera
    }

    /// Recomputes the cached view-projection matrix.
    ///
    /// Called after resizes even though the fixed square frustum makes the
    /// result identical; the revision counter still advances.
    pub fn update_projection(&mut self) {
        self.recompute();
    }

    pub fn view_projection(&self) -> &Mat4 {
        &self.view_projection
    }

    /// Number of projection recomputes since construction.
    pub fn projection_revision(&self) -> u32 {
        self.revision
    }

    fn recompute(&mut self) {
        let rcp_width = 1.0 / (self.right - self.left);
        let rcp_height = 1.0 / (self.top - self.bottom);
        let rcp_depth = 1.0 / (self.near - self.far);
        let projection: Mat4 = [
            [2.0 * rcp_width, 0.0, 0.0, 0.0],
            [0.0, 2.0 * rcp_height, 0.0, 0.0],
            [0.0, 0.0, rcp_depth, 0.0],
            [
                -(self.right + self.left) * rcp_width,
                -(self.top + self.bottom) * rcp_height,
                self.near * rcp_depth,
                1.0,
            ],
        ];
        let mut view = IDENTITY;
        view[3][0] = -self.position[0];
        view[3][1] = -self.position[1];
        view[3][2] = -self.position[2];
        self.view_projection = multiply(&projection, &view);
        self.revision = self.revision.wrapping_add(1);
    }
}

impl Default for OrthographicCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(matrix: &Mat4, point: [f32; 3]) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        let input = [point[0], point[1], point[2], 1.0];
        for row in 0..4 {
            out[row] = (0..4).map(|col| matrix[col][row] * input[col]).sum();
        }
        out
    }

    #[test]
    fn unit_plane_corners_land_on_clip_corners() {
        let camera = OrthographicCamera::new();
        let matrix = camera.view_projection();

        let top_right = transform(matrix, [0.5, 0.5, 0.0]);
        assert!((top_right[0] - 1.0).abs() < 1e-5);
        assert!((top_right[1] - 1.0).abs() < 1e-5);

        let bottom_left = transform(matrix, [-0.5, -0.5, 0.0]);
        assert!((bottom_left[0] + 1.0).abs() < 1e-5);
        assert!((bottom_left[1] + 1.0).abs() < 1e-5);

        // Plane depth stays inside the clip volume.
        let depth = top_right[2] / top_right[3];
        assert!((0.0..=1.0).contains(&depth));
    }

    #[test]
    fn projection_update_is_stable_but_counted() {
        let mut camera = OrthographicCamera::new();
        let before = *camera.view_projection();
        let revision = camera.projection_revision();

        camera.update_projection();

        assert_eq!(&before, camera.view_projection());
        assert_eq!(camera.projection_revision(), revision + 1);
    }
}
