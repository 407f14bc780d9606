use graft_di::{Instance, Interceptor, Next, ResolveError, ResolveRequest};

use crate::{customizer::Customizer, spec::ResolutionPlan};

/// Applies the customizations of a [Customizer] to every resolution of a customized type
///
/// Types without customizations are resolved unmodified by the rest of the chain.
pub struct CustomizationInterceptor {
    customizer: Customizer,
}

impl CustomizationInterceptor {
    pub fn new(customizer: Customizer) -> Self {
        CustomizationInterceptor { customizer }
    }

    fn resolve_customized(
        &self,
        request: &ResolveRequest<'_>,
        plan: ResolutionPlan,
    ) -> Result<Instance, ResolveError> {
        let container = request.container;
        // Mappings may change after setup, always use the current one
        let implementation = container.implementation_of(request.declared);

        let synthesized = if plan.capabilities.is_empty() {
            None
        } else {
            let base = container.shape_of(implementation)?;
            Some(
                self.customizer
                    .synthesizer()
                    .synthesize(&base, &plan.capabilities)?,
            )
        };

        let mut instance = container.construct(implementation)?;
        if let Some(synthesized) = synthesized {
            instance = synthesized.instantiate(instance)?;
        }
        tracing::trace!(
            "Constructed {} for {}",
            instance.type_name(),
            request.declared
        );

        for initializer in &plan.initializers {
            initializer(&mut instance)?;
        }

        if plan.build_up.resolve(self.customizer.default_build_up()) {
            container.perform_member_injection(&mut instance)?;
        } else {
            tracing::trace!("Skipping member injection for {}", instance.type_name());
        }

        Ok(instance)
    }
}

impl Interceptor for CustomizationInterceptor {
    fn intercept(&self, request: &ResolveRequest<'_>, next: Next<'_>) -> Result<Instance, ResolveError> {
        let Some(spec) = self.customizer.registry().get(request.declared.type_id) else {
            return next.proceed();
        };

        // Initializers are user code, don't hold the spec lock while running them
        let plan = spec.read().plan();
        tracing::debug!("Resolving customized {}", request.declared);
        self.resolve_customized(request, plan)
    }
}
