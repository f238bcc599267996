use std::ops::{Deref, DerefMut};

use nalgebra::{Matrix4, Unit, Vector3};

// Stack of model transforms. The bottom entry is never popped.
pub struct TransformStack {
    stack: Vec<Matrix4<f32>>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        TransformStack { stack: vec![Matrix4::identity()] }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn top(&self) -> &Matrix4<f32> {
        // never empty, see `TransformScope::drop`
        &self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Matrix4<f32> {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    pub fn push(&mut self) -> TransformScope<'_> {
        let top = *self.top();
        self.stack.push(top);
        TransformScope { stack: self }
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        let top = self.top_mut();
        *top *= Matrix4::new_translation(&Vector3::new(x, y, z));
    }

    pub fn rotate(&mut self, degrees: f32, axis: Unit<Vector3<f32>>) {
        let top = self.top_mut();
        *top *= Matrix4::from_axis_angle(&axis, degrees.to_radians());
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        let top = self.top_mut();
        *top *= Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, z));
    }
}

pub struct TransformScope<'a> {
    stack: &'a mut TransformStack,
}

impl Deref for TransformScope<'_> {
    type Target = TransformStack;

    fn deref(&self) -> &TransformStack {
        self.stack
    }
}

impl DerefMut for TransformScope<'_> {
    fn deref_mut(&mut self) -> &mut TransformStack {
        self.stack
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        if self.stack.stack.len() > 1 {
            self.stack.stack.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn apply(m: &Matrix4<f32>, p: [f32; 3]) -> Point3<f32> {
        m.transform_point(&Point3::new(p[0], p[1], p[2]))
    }

    #[test]
    fn test_scope_restores_previous_transform() {
        let mut stack = TransformStack::new();
        stack.translate(1.0, 0.0, 0.0);
        let before = *stack.top();
        {
            let mut scope = stack.push();
            scope.translate(0.0, 5.0, 0.0);
            assert_eq!(scope.depth(), 2);
            assert_eq!(apply(scope.top(), [0.0; 3]), Point3::new(1.0, 5.0, 0.0));
        }
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.top(), before);
    }

    #[test]
    fn test_nested_scopes_compose_parent_first() {
        let mut stack = TransformStack::new();
        let mut outer = stack.push();
        outer.translate(0.0, 0.0, 5.0);
        {
            let mut inner = outer.push();
            inner.rotate(90.0, Vector3::y_axis());
            // local +z turns into world +x, then the parent offset applies
            let p = apply(inner.top(), [0.0, 0.0, 1.0]);
            assert!((p - Point3::new(1.0, 0.0, 5.0)).norm() < 1e-5);
            assert_eq!(inner.depth(), 3);
        }
        assert_eq!(outer.depth(), 2);
        drop(outer);
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.top(), Matrix4::identity());
    }

    #[test]
    fn test_scale_applies_in_local_frame() {
        let mut stack = TransformStack::new();
        let mut scope = stack.push();
        scope.translate(2.0, 0.0, 0.0);
        scope.scale(3.0, 3.0, 3.0);
        assert_eq!(apply(scope.top(), [1.0, 1.0, 1.0]), Point3::new(5.0, 3.0, 3.0));
    }
}
